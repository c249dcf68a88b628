//! Commercial policy rules: quality mix per vehicle age segment
//!
//! Each model in the target category is placed in an age segment by its
//! last production year, its joined products are tallied by quality tier,
//! and the first matching rule for that segment decides the status and the
//! recommended action. Models that match no rule get a single "mix correct"
//! action.

use serde::{Deserialize, Serialize};

use crate::model::{FleetModel, ModelKey};
use crate::service::join_index::JoinIndex;
use crate::service::quality_classifier::{classify, QualityTier};

/// Last year (inclusive) of the vintage segment
pub const VINTAGE_MAX_YEAR: i32 = 2000;

/// Last year (inclusive) of the modern segment
pub const MODERN_MAX_YEAR: i32 = 2015;

/// Vehicle age segment by end of production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeSegment {
    /// Up to 2000; ideal mix is standard only
    Vintage,
    /// 2001 to 2015; ideal mix has both a premium-or-original and a standard option
    Modern,
    /// After 2015; ideal mix is premium / original only
    New,
}

impl AgeSegment {
    /// Segment for an end-of-production year. A model with no end year is
    /// still in production and counts as new.
    pub fn from_year_to(year_to: Option<i32>) -> Self {
        match year_to {
            Some(y) if y <= VINTAGE_MAX_YEAR => AgeSegment::Vintage,
            Some(y) if y <= MODERN_MAX_YEAR => AgeSegment::Modern,
            _ => AgeSegment::New,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeSegment::Vintage => "Vintage",
            AgeSegment::Modern => "Modern",
            AgeSegment::New => "New",
        }
    }
}

impl std::fmt::Display for AgeSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AgeSegment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vintage" => Ok(AgeSegment::Vintage),
            "modern" => Ok(AgeSegment::Modern),
            "new" => Ok(AgeSegment::New),
            other => Err(format!("unknown age segment: {}", other)),
        }
    }
}

/// Finding status; ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Warning,
    Critical,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Team a recommendation is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Purchasing,
    SalesProduct,
    SalesCommercial,
    DevelopmentProduct,
}

impl Team {
    pub fn label(&self) -> &'static str {
        match self {
            Team::Purchasing => "Purchasing",
            Team::SalesProduct => "Sales / Product",
            Team::SalesCommercial => "Sales / Commercial",
            Team::DevelopmentProduct => "Development / Product",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of recommendation; fixes the owning team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Add,
    Remove,
    Eval,
    Dev,
    Ok,
}

impl ActionType {
    pub fn team(&self) -> Option<Team> {
        match self {
            ActionType::Add => Some(Team::Purchasing),
            ActionType::Remove => Some(Team::SalesProduct),
            ActionType::Eval => Some(Team::SalesCommercial),
            ActionType::Dev => Some(Team::DevelopmentProduct),
            ActionType::Ok => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Add => "ADD",
            ActionType::Remove => "REMOVE",
            ActionType::Eval => "EVAL",
            ActionType::Dev => "DEV",
            ActionType::Ok => "OK",
        }
    }
}

/// Recommended follow-up for a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyAction {
    pub action_type: ActionType,
    pub text: String,
    pub team: Option<Team>,
}

impl PolicyAction {
    pub fn new(action_type: ActionType, text: impl Into<String>) -> Self {
        Self {
            action_type,
            text: text.into(),
            team: action_type.team(),
        }
    }

    /// `[TYPE] text (team)`, `(-)` when no team owns the action
    pub fn summary(&self) -> String {
        match self.team {
            Some(team) => format!("[{}] {} ({})", self.action_type.label(), self.text, team),
            None => format!("[{}] {} (-)", self.action_type.label(), self.text),
        }
    }
}

/// Products of one model tallied by quality tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QualityMix {
    pub original: usize,
    pub premium: usize,
    pub standard: usize,
}

impl QualityMix {
    pub fn add(&mut self, tier: QualityTier) {
        match tier {
            QualityTier::Original => self.original += 1,
            QualityTier::Premium => self.premium += 1,
            QualityTier::Standard => self.standard += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.original + self.premium + self.standard
    }

    /// Has a premium or original option
    pub fn has_premium_or_original(&self) -> bool {
        self.premium > 0 || self.original > 0
    }

    pub fn has_standard(&self) -> bool {
        self.standard > 0
    }
}

/// One row of the decision table
#[derive(Clone, Copy)]
pub struct PolicyRule {
    pub segment: AgeSegment,
    pub applies: fn(&QualityMix) -> bool,
    pub status: Status,
    pub action: ActionType,
    pub text: &'static str,
}

fn no_products(mix: &QualityMix) -> bool {
    mix.total() == 0
}

fn premium_without_standard(mix: &QualityMix) -> bool {
    mix.standard == 0 && mix.premium > 0
}

fn premium_with_standard(mix: &QualityMix) -> bool {
    mix.premium > 0 && mix.standard > 0
}

fn neither_option(mix: &QualityMix) -> bool {
    !mix.has_premium_or_original() && !mix.has_standard()
}

fn missing_premium_option(mix: &QualityMix) -> bool {
    !mix.has_premium_or_original()
}

fn missing_standard_option(mix: &QualityMix) -> bool {
    !mix.has_standard()
}

fn has_standard(mix: &QualityMix) -> bool {
    mix.has_standard()
}

/// Decision table, evaluated top to bottom; the first matching rule for a
/// model's segment wins.
pub const POLICY_RULES: &[PolicyRule] = &[
    PolicyRule {
        segment: AgeSegment::Vintage,
        applies: no_products,
        status: Status::Critical,
        action: ActionType::Dev,
        text: "develop standard-tier option",
    },
    PolicyRule {
        segment: AgeSegment::Vintage,
        applies: premium_without_standard,
        status: Status::Warning,
        action: ActionType::Eval,
        text: "evaluate standard-tier alternative for cost",
    },
    PolicyRule {
        segment: AgeSegment::Vintage,
        applies: premium_with_standard,
        status: Status::Warning,
        action: ActionType::Remove,
        text: "discontinue premium (low rotation)",
    },
    PolicyRule {
        segment: AgeSegment::Modern,
        applies: neither_option,
        status: Status::Critical,
        action: ActionType::Add,
        text: "no coverage: source a supplier",
    },
    PolicyRule {
        segment: AgeSegment::Modern,
        applies: missing_premium_option,
        status: Status::Warning,
        action: ActionType::Add,
        text: "add premium option",
    },
    PolicyRule {
        segment: AgeSegment::Modern,
        applies: missing_standard_option,
        status: Status::Warning,
        action: ActionType::Add,
        text: "add standard option",
    },
    PolicyRule {
        segment: AgeSegment::New,
        applies: missing_premium_option,
        status: Status::Critical,
        action: ActionType::Add,
        text: "missing premium/original line",
    },
    PolicyRule {
        segment: AgeSegment::New,
        applies: has_standard,
        status: Status::Warning,
        action: ActionType::Remove,
        text: "remove standard tier (brand risk)",
    },
];

/// Text of the action emitted when no rule fires
pub const MIX_CORRECT: &str = "mix correct";

/// Policy verdict for one fleet model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyFinding {
    pub model_id: ModelKey,
    pub brand: String,
    pub model_name: String,
    pub year_to: Option<i32>,
    pub segment: AgeSegment,
    pub mix: QualityMix,
    pub status: Status,
    /// Never empty
    pub actions: Vec<PolicyAction>,
}

/// Models of the fleet in a given priority category
pub fn select_policy_targets<'a>(fleet: &'a [FleetModel], category: &str) -> Vec<&'a FleetModel> {
    fleet
        .iter()
        .filter(|m| m.priority_category == category)
        .collect()
}

/// Tally quality tiers over a model's joined products
pub fn quality_mix(model: &FleetModel, index: &JoinIndex<'_>) -> QualityMix {
    let mut mix = QualityMix::default();
    for product in index.products_for_model(model) {
        mix.add(classify(&product.supplier_code));
    }
    mix
}

/// Evaluate one model against a rule table
pub fn evaluate_model(
    model: &FleetModel,
    index: &JoinIndex<'_>,
    rules: &[PolicyRule],
) -> PolicyFinding {
    let segment = AgeSegment::from_year_to(model.year_to);
    let mix = quality_mix(model, index);

    let (status, action) = rules
        .iter()
        .find(|rule| rule.segment == segment && (rule.applies)(&mix))
        .map(|rule| (rule.status, PolicyAction::new(rule.action, rule.text)))
        .unwrap_or_else(|| (Status::Ok, PolicyAction::new(ActionType::Ok, MIX_CORRECT)));

    PolicyFinding {
        model_id: model.model_id.clone(),
        brand: model.brand.clone(),
        model_name: model.model_name.clone(),
        year_to: model.year_to,
        segment,
        mix,
        status,
        actions: vec![action],
    }
}

/// Evaluate every target model with a custom rule table, most severe first
pub fn evaluate_with_rules(
    targets: &[&FleetModel],
    index: &JoinIndex<'_>,
    rules: &[PolicyRule],
) -> Vec<PolicyFinding> {
    let mut findings: Vec<PolicyFinding> = targets
        .iter()
        .map(|model| evaluate_model(model, index, rules))
        .collect();
    // stable: equal severities keep fleet order
    findings.sort_by(|a, b| b.status.cmp(&a.status));
    findings
}

/// Evaluate every target model with [`POLICY_RULES`], most severe first
pub fn evaluate(targets: &[&FleetModel], index: &JoinIndex<'_>) -> Vec<PolicyFinding> {
    evaluate_with_rules(targets, index, POLICY_RULES)
}

/// Keep only findings in one age segment
pub fn filter_by_segment(findings: &[PolicyFinding], segment: AgeSegment) -> Vec<&PolicyFinding> {
    findings.iter().filter(|f| f.segment == segment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductRecord;

    fn model(id: i64, year_to: i32) -> FleetModel {
        FleetModel {
            model_id: ModelKey::from(id),
            brand: "FORD".to_string(),
            model_name: format!("M{}", id),
            year_to: Some(year_to),
            priority_category: "AA".to_string(),
            ..Default::default()
        }
    }

    fn product(id: i64, supplier: &str) -> ProductRecord {
        ProductRecord {
            model_key: ModelKey::from(id),
            supplier_code: supplier.to_string(),
            ..Default::default()
        }
    }

    fn finding_for(year_to: i32, suppliers: &[&str]) -> PolicyFinding {
        let products: Vec<_> = suppliers.iter().map(|s| product(1, s)).collect();
        let index = JoinIndex::build(&products);
        evaluate_model(&model(1, year_to), &index, POLICY_RULES)
    }

    #[test]
    fn test_segment_boundaries() {
        assert_eq!(AgeSegment::from_year_to(Some(2000)), AgeSegment::Vintage);
        assert_eq!(AgeSegment::from_year_to(Some(2001)), AgeSegment::Modern);
        assert_eq!(AgeSegment::from_year_to(Some(2015)), AgeSegment::Modern);
        assert_eq!(AgeSegment::from_year_to(Some(2016)), AgeSegment::New);
        assert_eq!(AgeSegment::from_year_to(None), AgeSegment::New);
    }

    #[test]
    fn test_vintage_rules() {
        let f = finding_for(1995, &[]);
        assert_eq!(f.segment, AgeSegment::Vintage);
        assert_eq!(f.mix, QualityMix::default());
        assert_eq!(f.status, Status::Critical);
        assert_eq!(f.actions[0].text, "develop standard-tier option");
        assert_eq!(f.actions[0].team, Some(Team::DevelopmentProduct));

        let f = finding_for(1995, &["BOSCH"]);
        assert_eq!(f.status, Status::Warning);
        assert_eq!(f.actions[0].text, "evaluate standard-tier alternative for cost");
        assert_eq!(f.actions[0].team, Some(Team::SalesCommercial));

        let f = finding_for(1995, &["BOSCH", "GENERIC"]);
        assert_eq!(f.status, Status::Warning);
        assert_eq!(f.actions[0].text, "discontinue premium (low rotation)");

        let f = finding_for(1995, &["GENERIC"]);
        assert_eq!(f.status, Status::Ok);
        assert_eq!(f.actions[0].text, MIX_CORRECT);
        assert_eq!(f.actions[0].team, None);

        // original only is not a vintage gap
        let f = finding_for(1999, &["OEM"]);
        assert_eq!(f.status, Status::Ok);
    }

    #[test]
    fn test_modern_rules() {
        let f = finding_for(2010, &[]);
        assert_eq!(f.status, Status::Critical);
        assert_eq!(f.actions[0].text, "no coverage: source a supplier");
        assert_eq!(f.actions[0].team, Some(Team::Purchasing));

        let f = finding_for(2010, &["ACME"]);
        assert_eq!(f.status, Status::Warning);
        assert_eq!(f.actions[0].text, "add premium option");

        let f = finding_for(2010, &["ORIGINAL"]);
        assert_eq!(f.status, Status::Warning);
        assert_eq!(f.actions[0].text, "add standard option");

        let f = finding_for(2010, &["SKF", "4"]);
        assert_eq!(f.status, Status::Ok);
    }

    #[test]
    fn test_new_rules_precedence() {
        // standard only: the missing premium line wins over the standard removal
        let f = finding_for(2020, &["GENERIC"]);
        assert_eq!(f.status, Status::Critical);
        assert_eq!(f.actions.len(), 1);
        assert_eq!(f.actions[0].text, "missing premium/original line");

        let f = finding_for(2020, &["VALEO", "GENERIC"]);
        assert_eq!(f.status, Status::Warning);
        assert_eq!(f.actions[0].text, "remove standard tier (brand risk)");
        assert_eq!(f.actions[0].team, Some(Team::SalesProduct));

        let f = finding_for(2020, &["OEM", "1"]);
        assert_eq!(f.status, Status::Ok);
    }

    #[test]
    fn test_evaluate_sorts_by_severity_stably() {
        let fleet = vec![model(1, 2010), model(2, 2020), model(3, 1990), model(4, 2012)];
        let products = vec![
            product(1, "BOSCH"),
            product(1, "GENERIC"),
            product(2, "GENERIC"),
            product(4, "ACME"),
        ];
        let index = JoinIndex::build(&products);
        let targets: Vec<&FleetModel> = fleet.iter().collect();

        let findings = evaluate(&targets, &index);
        let order: Vec<_> = findings.iter().map(|f| f.model_name.as_str()).collect();
        // criticals 2, 3 (fleet order), then warning 4, then ok 1
        assert_eq!(order, vec!["M2", "M3", "M4", "M1"]);
    }

    #[test]
    fn test_select_targets_and_segment_filter() {
        let mut fleet = vec![model(1, 1990), model(2, 2020), model(3, 2020)];
        fleet[2].priority_category = "B".to_string();
        let targets = select_policy_targets(&fleet, "AA");
        assert_eq!(targets.len(), 2);

        let index = JoinIndex::default();
        let findings = evaluate(&targets, &index);
        let vintage = filter_by_segment(&findings, AgeSegment::Vintage);
        assert_eq!(vintage.len(), 1);
        assert_eq!(vintage[0].model_name, "M1");
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = [PolicyRule {
            segment: AgeSegment::New,
            applies: no_products,
            status: Status::Warning,
            action: ActionType::Eval,
            text: "review",
        }];
        let index = JoinIndex::default();
        let finding = evaluate_model(&model(9, 2022), &index, &rules);
        assert_eq!(finding.status, Status::Warning);
        assert_eq!(finding.actions[0].summary(), "[EVAL] review (Sales / Commercial)");
    }

    #[test]
    fn test_action_summary_without_team() {
        let action = PolicyAction::new(ActionType::Ok, MIX_CORRECT);
        assert_eq!(action.summary(), "[OK] mix correct (-)");
    }
}
