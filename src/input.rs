// 📝 Transaction Input - the validated record handed to the rule engine
// Form values arrive as free text; this module turns them into typed values.
//
// Two ways in:
//   - `TransactionInput` deserialized directly from JSON (numbers or numeric strings)
//   - `RawTransactionInput` (every field a string, as a form submits it) + `parse()`

use crate::error::InputError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;
use tracing::warn;

// ============================================================================
// CATEGORICAL VALUES
// ============================================================================

/// A closed set of values selectable on the input form.
///
/// `as_str` is the wire value (`current_employee`), `label` is for display.
pub trait FormValue: Sized + Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn label(&self) -> &'static str;

    /// Case-insensitive lookup of a wire value; unknown text yields `None`
    fn from_form(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerType {
    CurrentEmployee,
    FormerEmployee,
    Founder,
    Executive,
    Investor,
}

impl SellerType {
    /// Branching only distinguishes investors from everyone who provides services
    pub fn is_investor(&self) -> bool {
        matches!(self, SellerType::Investor)
    }

    /// "a founder", "an executive"
    pub fn with_article(&self) -> &'static str {
        match self {
            SellerType::CurrentEmployee => "a current employee",
            SellerType::FormerEmployee => "a former employee",
            SellerType::Founder => "a founder",
            SellerType::Executive => "an executive",
            SellerType::Investor => "an investor",
        }
    }
}

impl FormValue for SellerType {
    const ALL: &'static [Self] = &[
        SellerType::CurrentEmployee,
        SellerType::FormerEmployee,
        SellerType::Founder,
        SellerType::Executive,
        SellerType::Investor,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SellerType::CurrentEmployee => "current_employee",
            SellerType::FormerEmployee => "former_employee",
            SellerType::Founder => "founder",
            SellerType::Executive => "executive",
            SellerType::Investor => "investor",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SellerType::CurrentEmployee => "Current Employee",
            SellerType::FormerEmployee => "Former Employee",
            SellerType::Founder => "Founder",
            SellerType::Executive => "Executive",
            SellerType::Investor => "Investor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerType {
    Entity,
    RelatedParty,
    EconomicHolder,
    NewInvestor,
}

impl BuyerType {
    /// Buyers presumed to act on behalf of the entity
    pub fn is_related(&self) -> bool {
        matches!(self, BuyerType::RelatedParty | BuyerType::EconomicHolder)
    }

    pub fn with_article(&self) -> &'static str {
        match self {
            BuyerType::Entity => "the Company",
            BuyerType::RelatedParty => "a related party",
            BuyerType::EconomicHolder => "an economic interest holder",
            BuyerType::NewInvestor => "a new investor",
        }
    }
}

impl FormValue for BuyerType {
    const ALL: &'static [Self] = &[
        BuyerType::Entity,
        BuyerType::RelatedParty,
        BuyerType::EconomicHolder,
        BuyerType::NewInvestor,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            BuyerType::Entity => "entity",
            BuyerType::RelatedParty => "related_party",
            BuyerType::EconomicHolder => "economic_holder",
            BuyerType::NewInvestor => "new_investor",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BuyerType::Entity => "Entity (Company Repurchase)",
            BuyerType::RelatedParty => "Related Party",
            BuyerType::EconomicHolder => "Economic Interest Holder",
            BuyerType::NewInvestor => "New Investor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicInterest {
    DeMinimis,
    Significant,
}

impl FormValue for EconomicInterest {
    const ALL: &'static [Self] = &[EconomicInterest::DeMinimis, EconomicInterest::Significant];

    fn as_str(&self) -> &'static str {
        match self {
            EconomicInterest::DeMinimis => "de_minimis",
            EconomicInterest::Significant => "significant",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            EconomicInterest::DeMinimis => "De Minimis",
            EconomicInterest::Significant => "Significant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityInvolvement {
    Facilitated,
    Minimal,
    #[serde(rename = "none")]
    NotInvolved,
}

impl FormValue for EntityInvolvement {
    const ALL: &'static [Self] = &[
        EntityInvolvement::Facilitated,
        EntityInvolvement::Minimal,
        EntityInvolvement::NotInvolved,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            EntityInvolvement::Facilitated => "facilitated",
            EntityInvolvement::Minimal => "minimal",
            EntityInvolvement::NotInvolved => "none",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            EntityInvolvement::Facilitated => "Facilitated",
            EntityInvolvement::Minimal => "Minimal (Protective Rights Only)",
            EntityInvolvement::NotInvolved => "None",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareStatus {
    Mature,
    Immature,
}

impl FormValue for ShareStatus {
    const ALL: &'static [Self] = &[ShareStatus::Mature, ShareStatus::Immature];

    fn as_str(&self) -> &'static str {
        match self {
            ShareStatus::Mature => "mature",
            ShareStatus::Immature => "immature",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ShareStatus::Mature => "Mature (6+ months)",
            ShareStatus::Immature => "Immature (< 6 months)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

impl FormValue for YesNo {
    const ALL: &'static [Self] = &[YesNo::Yes, YesNo::No];

    fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContingentEvent {
    Probable,
    NotProbable,
    #[serde(rename = "na")]
    NotApplicable,
}

impl FormValue for ContingentEvent {
    const ALL: &'static [Self] = &[
        ContingentEvent::Probable,
        ContingentEvent::NotProbable,
        ContingentEvent::NotApplicable,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ContingentEvent::Probable => "probable",
            ContingentEvent::NotProbable => "not_probable",
            ContingentEvent::NotApplicable => "na",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ContingentEvent::Probable => "Probable",
            ContingentEvent::NotProbable => "Not Probable",
            ContingentEvent::NotApplicable => "N/A",
        }
    }
}

/// Optional enum lookup: blank means absent, unknown text is logged and dropped
fn parse_optional<T: FormValue>(field: &'static str, value: &str) -> Option<T> {
    if value.trim().is_empty() {
        return None;
    }
    let parsed = T::from_form(value);
    if parsed.is_none() {
        warn!(field, value, "unrecognized value treated as absent");
    }
    parsed
}

/// serde adapter: unknown strings on optional enum fields become `None`
/// instead of failing the whole record
fn lenient_enum<'de, D, T>(field: &'static str, deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FormValue,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| parse_optional(field, &value)))
}

/// One `deserialize_with` target per field so warnings name the JSON key
macro_rules! lenient_field {
    ($($name:ident => $field:literal),* $(,)?) => {
        $(
            fn $name<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
            where
                D: Deserializer<'de>,
                T: FormValue,
            {
                lenient_enum($field, deserializer)
            }
        )*
    };
}

lenient_field! {
    lenient_economic_interest => "economicInterest",
    lenient_entity_involvement => "entityInvolvement",
    lenient_share_status => "shareStatus",
    lenient_short_term_inducement => "isShortTermInducement",
    lenient_has_pattern => "hasPattern",
    lenient_contingent_event => "contingentEvent",
}

// ============================================================================
// TRANSACTION INPUT
// ============================================================================

/// Complete, validated description of one secondary-market transaction.
///
/// Constructed fresh for every evaluation and never mutated by the engine.
/// Absent optional fields fall through to the most conservative branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    // ========================================================================
    // DISPLAY ONLY
    // ========================================================================
    #[serde(default)]
    pub company_name: String,

    #[serde(default)]
    pub transaction_date: String,

    // ========================================================================
    // PRICING
    // ========================================================================
    /// Price paid per share
    pub transaction_price: Decimal,

    /// Fair value per share at the transaction date
    pub fair_value: Decimal,

    pub number_of_shares: u64,

    // ========================================================================
    // PARTIES
    // ========================================================================
    pub seller_type: SellerType,

    pub buyer_type: BuyerType,

    /// Only consulted when the buyer is a related party or economic holder
    #[serde(default, deserialize_with = "lenient_economic_interest", skip_serializing_if = "Option::is_none")]
    pub economic_interest: Option<EconomicInterest>,

    #[serde(default, deserialize_with = "lenient_entity_involvement", skip_serializing_if = "Option::is_none")]
    pub entity_involvement: Option<EntityInvolvement>,

    // ========================================================================
    // SHARE MATURITY
    // ========================================================================
    #[serde(default, deserialize_with = "lenient_share_status", skip_serializing_if = "Option::is_none")]
    pub share_status: Option<ShareStatus>,

    /// Months since vesting or option exercise
    #[serde(default)]
    pub months_held: Decimal,

    /// Compensation cost already recognized per share
    #[serde(default)]
    pub previously_cost: Decimal,

    #[serde(default, deserialize_with = "lenient_short_term_inducement", skip_serializing_if = "Option::is_none")]
    pub is_short_term_inducement: Option<YesNo>,

    #[serde(default, deserialize_with = "lenient_has_pattern", skip_serializing_if = "Option::is_none")]
    pub has_pattern: Option<YesNo>,

    #[serde(default, deserialize_with = "lenient_contingent_event", skip_serializing_if = "Option::is_none")]
    pub contingent_event: Option<ContingentEvent>,
}

impl TransactionInput {
    /// Minimal input: the parties and pricing, every optional field absent
    pub fn new(
        seller_type: SellerType,
        buyer_type: BuyerType,
        transaction_price: Decimal,
        fair_value: Decimal,
        number_of_shares: u64,
    ) -> Self {
        TransactionInput {
            company_name: String::new(),
            transaction_date: String::new(),
            transaction_price,
            fair_value,
            number_of_shares,
            seller_type,
            buyer_type,
            economic_interest: None,
            entity_involvement: None,
            share_status: None,
            months_held: Decimal::ZERO,
            previously_cost: Decimal::ZERO,
            is_short_term_inducement: None,
            has_pattern: None,
            contingent_event: None,
        }
    }

    /// Reject negative quantities (JSON can carry them even though forms cannot)
    /// and amounts whose total over the share count cannot be represented
    pub fn validate(&self) -> Result<(), InputError> {
        let checks = [
            ("transactionPrice", self.transaction_price),
            ("fairValue", self.fair_value),
            ("monthsHeld", self.months_held),
            ("previouslyCost", self.previously_cost),
        ];

        for (field, value) in checks {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(InputError::Negative {
                    field,
                    value: value.to_string(),
                });
            }
        }

        self.check_totals()
    }

    /// Every per-share amount multiplied by the share count must fit in a Decimal
    fn check_totals(&self) -> Result<(), InputError> {
        let shares = Decimal::from(self.number_of_shares);
        let amounts = [
            ("transactionPrice", self.transaction_price),
            ("fairValue", self.fair_value),
            ("previouslyCost", self.previously_cost),
        ];

        for (field, value) in amounts {
            if value.checked_mul(shares).is_none() {
                return Err(InputError::OutOfRange {
                    field,
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Stable hash of every field, usable as a cache key for results.
    /// Numbers are normalized so "15" and "15.00" hash alike.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!(
            "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.company_name,
            self.transaction_date,
            self.transaction_price.normalize(),
            self.fair_value.normalize(),
            self.number_of_shares,
            self.seller_type.as_str(),
            self.buyer_type.as_str(),
            self.economic_interest.map(|v| v.as_str()).unwrap_or(""),
            self.entity_involvement.map(|v| v.as_str()).unwrap_or(""),
            self.share_status.map(|v| v.as_str()).unwrap_or(""),
            self.months_held.normalize(),
            self.previously_cost.normalize(),
            self.is_short_term_inducement.map(|v| v.as_str()).unwrap_or(""),
            self.has_pattern.map(|v| v.as_str()).unwrap_or(""),
            self.contingent_event.map(|v| v.as_str()).unwrap_or(""),
        ));
        format!("{:x}", hasher.finalize())
    }

    /// Sample record used by the CLI `template` command
    pub fn sample() -> Self {
        TransactionInput {
            company_name: "Acme Robotics, Inc.".to_string(),
            transaction_date: "2025-03-31".to_string(),
            economic_interest: None,
            entity_involvement: Some(EntityInvolvement::Facilitated),
            share_status: Some(ShareStatus::Mature),
            months_held: Decimal::from(18),
            ..TransactionInput::new(
                SellerType::CurrentEmployee,
                BuyerType::NewInvestor,
                Decimal::from(15),
                Decimal::from(10),
                1000,
            )
        }
    }
}

// ============================================================================
// RAW FORM INPUT
// ============================================================================

/// How malformed numeric text is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Reject malformed or negative numbers
    #[default]
    Strict,
    /// Coerce malformed or negative numbers to zero (form behavior)
    Lenient,
}

/// Form state exactly as the user typed it. Every field is text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTransactionInput {
    pub company_name: String,
    pub transaction_date: String,
    pub transaction_price: String,
    pub fair_value: String,
    pub number_of_shares: String,
    pub seller_type: String,
    pub buyer_type: String,
    pub economic_interest: String,
    pub entity_involvement: String,
    pub share_status: String,
    pub months_held: String,
    pub previously_cost: String,
    pub is_short_term_inducement: String,
    pub has_pattern: String,
    pub contingent_event: String,
}

impl RawTransactionInput {
    /// Validate the form into a `TransactionInput`
    pub fn parse(&self, mode: ParseMode) -> Result<TransactionInput, InputError> {
        let seller_type = SellerType::from_form(&self.seller_type)
            .ok_or(InputError::MissingField { field: "sellerType" })?;
        let buyer_type = BuyerType::from_form(&self.buyer_type)
            .ok_or(InputError::MissingField { field: "buyerType" })?;

        let input = TransactionInput {
            company_name: self.company_name.trim().to_string(),
            transaction_date: self.transaction_date.trim().to_string(),
            transaction_price: parse_amount("transactionPrice", &self.transaction_price, mode)?,
            fair_value: parse_amount("fairValue", &self.fair_value, mode)?,
            number_of_shares: parse_share_count(&self.number_of_shares, mode)?,
            seller_type,
            buyer_type,
            economic_interest: parse_optional("economicInterest", &self.economic_interest),
            entity_involvement: parse_optional("entityInvolvement", &self.entity_involvement),
            share_status: parse_optional("shareStatus", &self.share_status),
            months_held: parse_amount("monthsHeld", &self.months_held, mode)?,
            previously_cost: parse_amount("previouslyCost", &self.previously_cost, mode)?,
            is_short_term_inducement: parse_optional(
                "isShortTermInducement",
                &self.is_short_term_inducement,
            ),
            has_pattern: parse_optional("hasPattern", &self.has_pattern),
            contingent_event: parse_optional("contingentEvent", &self.contingent_event),
        };

        input.check_totals()?;
        Ok(input)
    }
}

impl From<&TransactionInput> for RawTransactionInput {
    fn from(input: &TransactionInput) -> Self {
        fn opt<T: FormValue>(value: Option<T>) -> String {
            value.map(|v| v.as_str().to_string()).unwrap_or_default()
        }

        RawTransactionInput {
            company_name: input.company_name.clone(),
            transaction_date: input.transaction_date.clone(),
            transaction_price: input.transaction_price.to_string(),
            fair_value: input.fair_value.to_string(),
            number_of_shares: input.number_of_shares.to_string(),
            seller_type: input.seller_type.as_str().to_string(),
            buyer_type: input.buyer_type.as_str().to_string(),
            economic_interest: opt(input.economic_interest),
            entity_involvement: opt(input.entity_involvement),
            share_status: opt(input.share_status),
            months_held: input.months_held.to_string(),
            previously_cost: input.previously_cost.to_string(),
            is_short_term_inducement: opt(input.is_short_term_inducement),
            has_pattern: opt(input.has_pattern),
            contingent_event: opt(input.contingent_event),
        }
    }
}

// ============================================================================
// NUMBER PARSING
// ============================================================================

/// Parse a non-negative amount. Blank text is zero.
/// Accepts "$1,250.50" style input.
fn parse_amount(field: &'static str, text: &str, mode: ParseMode) -> Result<Decimal, InputError> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let value = match Decimal::from_str(&cleaned) {
        Ok(value) => value,
        Err(_) => {
            return coerce(field, text, mode, || InputError::InvalidNumber {
                field,
                value: text.to_string(),
            })
        }
    };

    if value.is_sign_negative() && !value.is_zero() {
        return coerce(field, text, mode, || InputError::Negative {
            field,
            value: text.to_string(),
        });
    }

    Ok(value)
}

fn parse_share_count(text: &str, mode: ParseMode) -> Result<u64, InputError> {
    const FIELD: &str = "numberOfShares";

    let amount = parse_amount(FIELD, text, mode)?;
    if amount.fract().is_zero() {
        if let Some(count) = amount.to_u64() {
            return Ok(count);
        }
    }

    match mode {
        ParseMode::Strict => Err(InputError::InvalidNumber {
            field: FIELD,
            value: text.to_string(),
        }),
        ParseMode::Lenient => {
            let truncated = amount.trunc().to_u64().unwrap_or(0);
            warn!(field = FIELD, value = text, truncated, "share count truncated");
            Ok(truncated)
        }
    }
}

fn coerce(
    field: &'static str,
    text: &str,
    mode: ParseMode,
    error: impl FnOnce() -> InputError,
) -> Result<Decimal, InputError> {
    match mode {
        ParseMode::Strict => Err(error()),
        ParseMode::Lenient => {
            warn!(field, value = text, "malformed number coerced to zero");
            Ok(Decimal::ZERO)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
