use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::hand::{HandKind, Role};

pub const DEFAULT_RULE_ID: &str = "1";

/// A named payout scheme: one multiplier table per role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    dealer: BTreeMap<HandKind, u64>,
    participant: BTreeMap<HandKind, u64>,
}

impl Rule {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            dealer: BTreeMap::new(),
            participant: BTreeMap::new(),
        }
    }

    pub fn with_multiplier(mut self, role: Role, kind: HandKind, multiplier: u64) -> Self {
        self.table_mut(role).insert(kind, multiplier);
        self
    }

    /// Multiplier paid when a hand of `kind` held by `role` wins.
    ///
    /// Kinds absent from the role's table pay 1.
    ///
    /// ```
    /// use xidach_engine::hand::{HandKind, Role};
    /// use xidach_engine::rules::find_rule;
    ///
    /// let rule = find_rule("2").unwrap();
    /// assert_eq!(rule.multiplier(Role::Participant, HandKind::DoubleBlackJack), 2);
    /// assert_eq!(rule.multiplier(Role::Dealer, HandKind::DoubleBlackJack), 1);
    /// ```
    pub fn multiplier(&self, role: Role, kind: HandKind) -> u64 {
        self.table(role).get(&kind).copied().unwrap_or(1)
    }

    fn table(&self, role: Role) -> &BTreeMap<HandKind, u64> {
        match role {
            Role::Dealer => &self.dealer,
            Role::Participant => &self.participant,
        }
    }

    fn table_mut(&mut self, role: Role) -> &mut BTreeMap<HandKind, u64> {
        match role {
            Role::Dealer => &mut self.dealer,
            Role::Participant => &mut self.participant,
        }
    }
}

fn registry() -> &'static BTreeMap<String, Rule> {
    static RULES: OnceLock<BTreeMap<String, Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let mut hai_dinh = Rule::new(
            "1",
            "Hai Dinh",
            "Blackjack and high five pay x2, double blackjack pays x3. Same for dealer and participants.",
        );
        for role in [Role::Dealer, Role::Participant] {
            hai_dinh = hai_dinh
                .with_multiplier(role, HandKind::DoubleBlackJack, 3)
                .with_multiplier(role, HandKind::HighFive, 2)
                .with_multiplier(role, HandKind::BlackJack, 2);
        }
        let normal = Rule::new(
            "2",
            "Normal",
            "Double blackjack pays x2 for participants, x1 for the dealer.",
        )
        .with_multiplier(Role::Participant, HandKind::DoubleBlackJack, 2);

        [hai_dinh, normal]
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect()
    })
}

/// Looks up a registered rule by id.
pub fn find_rule(id: &str) -> Result<&'static Rule, GameError> {
    registry()
        .get(id)
        .ok_or_else(|| GameError::RuleNotFound(id.to_string()))
}

pub fn default_rule() -> &'static Rule {
    &registry()[DEFAULT_RULE_ID]
}

/// All registered rules, sorted by id.
pub fn rules() -> Vec<&'static Rule> {
    registry().values().collect()
}

pub fn rule_list_text() -> String {
    let mut out = String::from("Rules:");
    for rule in rules() {
        let _ = write!(out, "\n\n - Rule: {}, ID: {}\n{}", rule.name, rule.id, rule.description);
    }
    out
}
