//! # Boundary Validation
//!
//! Turns a raw [`AllocationRequest`] (as received from the REST
//! collaborators, with numbers that may arrive as JSON numbers or numeric
//! strings) into a typed [`AllocationInput`].
//!
//! Validation is all-or-nothing and runs before any aggregation: the first
//! malformed field aborts with a [`ValidationError`] that names the field,
//! the raw value, and the owning entity.
//!
//! ## Checks
//!
//! | Input | Rejected when |
//! |-------|---------------|
//! | `period.year` / `period.month` | absent, non-integer, month outside 1..=12 |
//! | invoice `amount` | non-numeric, magnitude above [`MAX_ABS_AMOUNT`], negative under a policy forbidding it |
//! | tenant / override `percentage` | non-numeric or outside [0, 100] |
//! | any `utility_type` | outside the closed set |
//! | reading `consumption` | present but non-numeric, magnitude above [`MAX_ABS_CONSUMPTION`], more than [`MAX_CONSUMPTION_SCALE`] decimal places |
//! | record `period_year` / `period_month` | malformed, or different from the request period when enforced |
//! | tenants | duplicate id, duplicate utility type within one tenant |
//! | readings | more than one general meter |
//!
//! Inactive tenants are dropped here; the calculator never filters.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use apportion_core::{
    BillingPeriod, Decimal, InvoiceId, MeterId, Percentage, ProviderId, ReadingId, TenantId,
    UtilityType,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::allocation::{compute_allocation, AllocationResult};
use crate::error::{CalcError, ValidationError};
use crate::overrides::PercentageOverrides;
use crate::records::{MeterReadingRecord, TenantShares, UtilityInvoiceRecord};

/// Largest accepted invoice amount magnitude (10^15).
///
/// Keeps every product and sum in the calculator far inside the range of
/// `Decimal`.
pub const MAX_ABS_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Largest accepted meter consumption magnitude (10^15).
pub const MAX_ABS_CONSUMPTION: Decimal = MAX_ABS_AMOUNT;

/// Most decimal places accepted on a meter consumption.
///
/// Together with [`MAX_ABS_CONSUMPTION`] this bounds the reconciliation
/// ratio `difference / general` well inside the range of `Decimal`.
pub const MAX_CONSUMPTION_SCALE: u32 = 6;

// ─── Policy ──────────────────────────────────────────────────────────

/// Caller-supplied validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationPolicy {
    /// Accept negative invoice amounts (credit notes).
    pub allow_negative_amounts: bool,
    /// Reject records whose period differs from the request period.
    pub enforce_period: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            allow_negative_amounts: false,
            enforce_period: true,
        }
    }
}

// ─── Raw request ─────────────────────────────────────────────────────

/// Period fields as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPeriod {
    /// Calendar year.
    #[serde(default)]
    pub year: Option<Value>,
    /// Calendar month, 1-based.
    #[serde(default)]
    pub month: Option<Value>,
}

/// A supplier invoice as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInvoice {
    /// Invoice identifier.
    pub id: InvoiceId,
    /// Utility type string.
    pub utility_type: String,
    /// Amount as a JSON number or numeric string.
    pub amount: Value,
    /// Optional period year of the record.
    #[serde(default)]
    pub period_year: Option<Value>,
    /// Optional period month of the record.
    #[serde(default)]
    pub period_month: Option<Value>,
    /// Supplier, when known.
    #[serde(default)]
    pub provider_id: Option<ProviderId>,
}

/// A meter reading as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Reading identifier.
    pub id: ReadingId,
    /// The meter that was read.
    pub meter_id: MeterId,
    /// Whether this is the general meter.
    #[serde(default)]
    pub is_general: bool,
    /// Consumption; `null` or absent means not yet computed.
    #[serde(default)]
    pub consumption: Option<Value>,
    /// Optional period year of the record.
    #[serde(default)]
    pub period_year: Option<Value>,
    /// Optional period month of the record.
    #[serde(default)]
    pub period_month: Option<Value>,
}

/// One configured share as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUtilityPercentage {
    /// Utility type string.
    pub utility_type: String,
    /// Percentage as a JSON number or numeric string.
    pub percentage: Value,
}

/// A tenant as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTenant {
    /// Tenant identifier.
    pub id: TenantId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the tenant takes part in this period's allocation.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Standing shares per utility type.
    #[serde(default)]
    pub utility_percentages: Vec<RawUtilityPercentage>,
}

fn default_active() -> bool {
    true
}

/// The full allocation request for one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// The billing period.
    #[serde(default)]
    pub period: Option<RawPeriod>,
    /// Supplier invoices for the period.
    #[serde(default)]
    pub invoices: Vec<RawInvoice>,
    /// Meter readings for the period.
    #[serde(default)]
    pub readings: Vec<RawReading>,
    /// Tenants and their standing shares.
    #[serde(default)]
    pub tenants: Vec<RawTenant>,
    /// Per-calculation overrides: tenant id → utility type → percentage.
    #[serde(default)]
    pub overrides: BTreeMap<TenantId, BTreeMap<String, Value>>,
}

// ─── Validated input ─────────────────────────────────────────────────

/// Typed calculator input produced by [`validate_request()`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationInput {
    /// The billing period.
    pub period: BillingPeriod,
    /// Supplier invoices.
    pub invoices: Vec<UtilityInvoiceRecord>,
    /// Meter readings.
    pub readings: Vec<MeterReadingRecord>,
    /// Active tenants only.
    pub tenants: Vec<TenantShares>,
    /// Per-calculation overrides.
    pub overrides: PercentageOverrides,
}

impl AllocationInput {
    /// Active tenants with overrides applied.
    pub fn effective_tenants(&self) -> Result<Vec<TenantShares>, CalcError> {
        self.overrides.apply(&self.tenants)
    }

    /// Apply overrides and compute the allocation.
    pub fn compute(&self) -> Result<AllocationResult, CalcError> {
        let tenants = self.effective_tenants()?;
        Ok(compute_allocation(
            self.period,
            &self.invoices,
            &self.readings,
            &tenants,
        ))
    }
}

/// Validate a raw request.
///
/// # Errors
///
/// The first [`ValidationError`] encountered, checking the period first,
/// then invoices, readings, tenants, and overrides in input order.
pub fn validate_request(
    request: &AllocationRequest,
    policy: &ValidationPolicy,
) -> Result<AllocationInput, ValidationError> {
    let period = validate_period(request.period.as_ref())?;

    let invoices = request
        .invoices
        .iter()
        .map(|raw| validate_invoice(raw, period, policy))
        .collect::<Result<Vec<_>, _>>()?;

    let readings = request
        .readings
        .iter()
        .map(|raw| validate_reading(raw, period, policy))
        .collect::<Result<Vec<_>, _>>()?;
    check_single_general_meter(&readings)?;

    let mut seen = BTreeSet::new();
    let mut tenants = Vec::with_capacity(request.tenants.len());
    for raw in &request.tenants {
        if !seen.insert(raw.id) {
            return Err(ValidationError::DuplicateTenant { tenant_id: raw.id });
        }
        let shares = validate_tenant(raw)?;
        if raw.active {
            tenants.push(shares);
        } else {
            tracing::debug!(tenant = %raw.id, "skipping inactive tenant");
        }
    }

    let overrides = validate_overrides(&request.overrides)?;

    tracing::debug!(
        period = %period,
        invoices = invoices.len(),
        readings = readings.len(),
        active_tenants = tenants.len(),
        overrides = overrides.len(),
        "allocation request validated"
    );

    Ok(AllocationInput {
        period,
        invoices,
        readings,
        tenants,
        overrides,
    })
}

fn validate_period(raw: Option<&RawPeriod>) -> Result<BillingPeriod, ValidationError> {
    let raw = raw.cloned().unwrap_or_default();
    let year = parse_period_component(raw.year.as_ref(), "period.year")?;
    let month = parse_period_component(raw.month.as_ref(), "period.month")?;
    build_period(year, month, "period.year", "period.month")
}

fn build_period(
    year: i64,
    month: i64,
    year_field: &str,
    month_field: &str,
) -> Result<BillingPeriod, ValidationError> {
    let year_i32 = i32::try_from(year).map_err(|_| ValidationError::MissingPeriod {
        field: year_field.to_string(),
        value: year.to_string(),
    })?;
    let month_u32 = u32::try_from(month).map_err(|_| ValidationError::MissingPeriod {
        field: month_field.to_string(),
        value: month.to_string(),
    })?;
    BillingPeriod::new(year_i32, month_u32).map_err(|e| {
        let field = if (1..=12).contains(&month_u32) {
            year_field
        } else {
            month_field
        };
        ValidationError::MissingPeriod {
            field: field.to_string(),
            value: e.to_string(),
        }
    })
}

fn parse_period_component(value: Option<&Value>, field: &str) -> Result<i64, ValidationError> {
    let missing = |value: String| ValidationError::MissingPeriod {
        field: field.to_string(),
        value,
    };
    match value {
        None | Some(Value::Null) => Err(missing("<absent>".to_string())),
        Some(v) => parse_integer(v).ok_or_else(|| missing(v.to_string())),
    }
}

/// Check a record's own period, when it carries one.
fn validate_record_period(
    year: Option<&Value>,
    month: Option<&Value>,
    entity: &str,
    expected: BillingPeriod,
    policy: &ValidationPolicy,
) -> Result<BillingPeriod, ValidationError> {
    let year = match year {
        None | Some(Value::Null) => None,
        Some(_) => Some(parse_period_component(year, &format!("{entity}.period_year"))?),
    };
    let month = match month {
        None | Some(Value::Null) => None,
        Some(_) => Some(parse_period_component(month, &format!("{entity}.period_month"))?),
    };
    let found = match (year, month) {
        (None, None) => return Ok(expected),
        (y, m) => build_period(
            y.unwrap_or(i64::from(expected.year())),
            m.unwrap_or(i64::from(expected.month())),
            &format!("{entity}.period_year"),
            &format!("{entity}.period_month"),
        )?,
    };
    if policy.enforce_period && found != expected {
        return Err(ValidationError::PeriodMismatch {
            entity: entity.to_string(),
            expected,
            found: found.label(),
        });
    }
    Ok(found)
}

fn validate_invoice(
    raw: &RawInvoice,
    period: BillingPeriod,
    policy: &ValidationPolicy,
) -> Result<UtilityInvoiceRecord, ValidationError> {
    let entity = raw.id.to_string();
    let utility_type = parse_utility(&raw.utility_type, &entity)?;
    let invalid = |reason: &str| ValidationError::InvalidAmount {
        invoice_id: raw.id,
        value: raw.amount.to_string(),
        reason: reason.to_string(),
    };
    let amount = parse_decimal(&raw.amount).ok_or_else(|| invalid("not a number"))?;
    if amount.abs() > MAX_ABS_AMOUNT {
        return Err(invalid("exceeds the maximum supported amount"));
    }
    if amount.is_sign_negative() && !amount.is_zero() && !policy.allow_negative_amounts {
        return Err(invalid("negative amounts are not allowed"));
    }
    let period = validate_record_period(
        raw.period_year.as_ref(),
        raw.period_month.as_ref(),
        &entity,
        period,
        policy,
    )?;
    Ok(UtilityInvoiceRecord {
        id: raw.id,
        utility_type,
        amount,
        period,
        provider_id: raw.provider_id,
    })
}

fn validate_reading(
    raw: &RawReading,
    period: BillingPeriod,
    policy: &ValidationPolicy,
) -> Result<MeterReadingRecord, ValidationError> {
    let entity = raw.id.to_string();
    let consumption = match &raw.consumption {
        None | Some(Value::Null) => None,
        Some(v) => Some(validate_consumption(raw.id, v)?),
    };
    let period = validate_record_period(
        raw.period_year.as_ref(),
        raw.period_month.as_ref(),
        &entity,
        period,
        policy,
    )?;
    Ok(MeterReadingRecord {
        id: raw.id,
        meter_id: raw.meter_id,
        is_general: raw.is_general,
        consumption,
        period,
    })
}

fn validate_consumption(reading_id: ReadingId, value: &Value) -> Result<Decimal, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidConsumption {
        reading_id,
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let consumption = parse_decimal(value).ok_or_else(|| invalid("not a number"))?;
    if consumption.abs() > MAX_ABS_CONSUMPTION {
        return Err(invalid("exceeds the maximum supported consumption"));
    }
    if consumption.normalize().scale() > MAX_CONSUMPTION_SCALE {
        return Err(invalid("more decimal places than a meter reports"));
    }
    Ok(consumption)
}

fn check_single_general_meter(readings: &[MeterReadingRecord]) -> Result<(), ValidationError> {
    let mut general = readings.iter().filter(|r| r.is_general);
    if let (Some(first), Some(second)) = (general.next(), general.next()) {
        return Err(ValidationError::MultipleGeneralMeters {
            first: first.id,
            second: second.id,
        });
    }
    Ok(())
}

fn validate_tenant(raw: &RawTenant) -> Result<TenantShares, ValidationError> {
    let entity = raw.id.to_string();
    let mut shares = TenantShares::new(raw.id);
    shares.name = raw.name.clone();
    let mut configured = BTreeSet::new();
    for entry in &raw.utility_percentages {
        let utility = parse_utility(&entry.utility_type, &entity)?;
        if !configured.insert(utility) {
            return Err(ValidationError::DuplicateTenantUtility {
                tenant_id: raw.id,
                utility_type: entry.utility_type.clone(),
            });
        }
        let pct = parse_percentage(&entry.percentage, raw.id, &entry.utility_type)?;
        shares.percentages.set(utility, pct);
    }
    Ok(shares)
}

fn validate_overrides(
    raw: &BTreeMap<TenantId, BTreeMap<String, Value>>,
) -> Result<PercentageOverrides, ValidationError> {
    let mut overrides = PercentageOverrides::new();
    for (tenant_id, shares) in raw {
        for (utility_str, value) in shares {
            let utility = parse_utility(utility_str, &format!("override for {tenant_id}"))?;
            let pct = parse_percentage(value, *tenant_id, utility_str)?;
            overrides.set(*tenant_id, utility, pct);
        }
    }
    Ok(overrides)
}

fn parse_utility(value: &str, entity: &str) -> Result<UtilityType, ValidationError> {
    UtilityType::from_str(value).map_err(|_| ValidationError::UnknownUtilityType {
        entity: entity.to_string(),
        value: value.to_string(),
    })
}

fn parse_percentage(
    value: &Value,
    tenant_id: TenantId,
    utility_type: &str,
) -> Result<Percentage, ValidationError> {
    parse_decimal(value)
        .and_then(|d| Percentage::new(d).ok())
        .ok_or_else(|| ValidationError::InvalidPercentage {
            tenant_id,
            utility_type: utility_type.to_string(),
            value: value.to_string(),
        })
}

/// Parse a JSON number or numeric string into an exact decimal.
///
/// Accepts plain and scientific notation. Booleans, nulls, arrays,
/// objects, and non-numeric strings yield `None`.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                parse_decimal_str(&n.to_string())
            }
        }
        Value::String(s) => parse_decimal_str(s.trim()),
        _ => None,
    }
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Parse a JSON integer or integer string.
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn request(value: Value) -> AllocationRequest {
        serde_json::from_value(value).unwrap()
    }

    fn base() -> Value {
        json!({
            "period": {"year": 2024, "month": 3},
            "invoices": [
                {"id": 1, "utility_type": "electricity", "amount": 500},
                {"id": 2, "utility_type": "electricity", "amount": "300.00", "period_year": 2024, "period_month": 3}
            ],
            "readings": [
                {"id": 10, "meter_id": 1, "is_general": true, "consumption": 1000},
                {"id": 11, "meter_id": 2, "consumption": null}
            ],
            "tenants": [
                {"id": 1, "name": "Bakery", "utility_percentages": [
                    {"utility_type": "electricity", "percentage": 40}
                ]},
                {"id": 2, "active": true, "utility_percentages": [
                    {"utility_type": "electricity", "percentage": "30"}
                ]},
                {"id": 3, "active": false, "utility_percentages": [
                    {"utility_type": "electricity", "percentage": 50}
                ]}
            ]
        })
    }

    #[test]
    fn test_valid_request() {
        let input = validate_request(&request(base()), &ValidationPolicy::default()).unwrap();
        assert_eq!(input.period, BillingPeriod::new(2024, 3).unwrap());
        assert_eq!(input.invoices.len(), 2);
        assert_eq!(input.invoices[1].amount, dec!(300));
        assert_eq!(input.readings[1].consumption, None);
        assert_eq!(input.tenants.len(), 2, "inactive tenant dropped");
        assert_eq!(input.tenants[0].name.as_deref(), Some("Bakery"));
        assert!(input.overrides.is_empty());
    }

    #[test]
    fn test_compute_from_request() {
        let input = validate_request(&request(base()), &ValidationPolicy::default()).unwrap();
        let result = input.compute().unwrap();
        assert_eq!(result.company_portion[UtilityType::Electricity].amount, dec!(240));
        assert_eq!(result.meter_reconciliation.general_consumption, dec!(1000));
    }

    #[test]
    fn test_missing_period() {
        let mut v = base();
        v.as_object_mut().unwrap().remove("period");
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingPeriod {
                field: "period.year".to_string(),
                value: "<absent>".to_string(),
            }
        );
    }

    #[test]
    fn test_non_integer_month() {
        let mut v = base();
        v["period"]["month"] = json!(3.5);
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingPeriod { ref field, .. } if field == "period.month"));
    }

    #[test]
    fn test_month_out_of_range() {
        let mut v = base();
        v["period"]["month"] = json!(13);
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingPeriod { ref field, .. } if field == "period.month"));
    }

    #[test]
    fn test_non_numeric_amount() {
        let mut v = base();
        v["invoices"][0]["amount"] = json!("twelve");
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidAmount { invoice_id, ref value, .. }
                if invoice_id == InvoiceId(1) && value == "\"twelve\""
        ));
    }

    #[test]
    fn test_negative_amount_policy() {
        let mut v = base();
        v["invoices"][0]["amount"] = json!(-50);
        let strict = validate_request(&request(v.clone()), &ValidationPolicy::default());
        assert!(matches!(strict, Err(ValidationError::InvalidAmount { .. })));

        let lenient = ValidationPolicy {
            allow_negative_amounts: true,
            ..ValidationPolicy::default()
        };
        let input = validate_request(&request(v), &lenient).unwrap();
        assert_eq!(input.invoices[0].amount, dec!(-50));
    }

    #[test]
    fn test_amount_too_large() {
        let mut v = base();
        v["invoices"][0]["amount"] = json!("1e20");
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount { .. }));
    }

    #[test]
    fn test_consumption_too_large() {
        let mut v = base();
        v["readings"][1]["consumption"] = json!("79228162514264337593543950335");
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidConsumption { reading_id, ref reason, .. }
                if reading_id == ReadingId(11) && reason.contains("maximum")
        ));
    }

    #[test]
    fn test_consumption_too_precise() {
        let mut v = base();
        v["readings"][0]["consumption"] = json!("0.00000000000000000001");
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidConsumption { reading_id, .. } if reading_id == ReadingId(10)
        ));
    }

    #[test]
    fn test_consumption_at_limits_computes() {
        let mut v = base();
        v["readings"][0]["consumption"] = json!("0.000001");
        v["readings"][1]["consumption"] = json!("1000000000000000");
        v["readings"]
            .as_array_mut()
            .unwrap()
            .push(json!({"id": 12, "meter_id": 3, "consumption": "1000000000000000"}));
        let input = validate_request(&request(v), &ValidationPolicy::default()).unwrap();
        let result = input.compute().unwrap();
        assert!(result.meter_reconciliation.unallocated_percent < Decimal::ZERO);
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        let mut v = base();
        v["readings"][1]["consumption"] = json!("300.000000000");
        let input = validate_request(&request(v), &ValidationPolicy::default()).unwrap();
        assert_eq!(input.readings[1].consumption, Some(dec!(300)));
    }

    #[test]
    fn test_percentage_out_of_range() {
        let mut v = base();
        v["tenants"][1]["utility_percentages"][0]["percentage"] = json!(120);
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidPercentage {
                tenant_id: TenantId(2),
                utility_type: "electricity".to_string(),
                value: "120".to_string(),
            }
        );
    }

    #[test]
    fn test_inactive_tenant_still_validated() {
        let mut v = base();
        v["tenants"][2]["utility_percentages"][0]["percentage"] = json!(-1);
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPercentage { tenant_id, .. } if tenant_id == TenantId(3)));
    }

    #[test]
    fn test_unknown_utility_type() {
        let mut v = base();
        v["invoices"][1]["utility_type"] = json!("heating");
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownUtilityType {
                entity: "invoice:2".to_string(),
                value: "heating".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_consumption() {
        let mut v = base();
        v["readings"][1]["consumption"] = json!(true);
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidConsumption { reading_id, .. } if reading_id == ReadingId(11)));
    }

    #[test]
    fn test_period_mismatch() {
        let mut v = base();
        v["invoices"][0]["period_month"] = json!(2);
        let err = validate_request(&request(v.clone()), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::PeriodMismatch { ref found, .. } if found == "2024-02"
        ));

        let relaxed = ValidationPolicy {
            enforce_period: false,
            ..ValidationPolicy::default()
        };
        let input = validate_request(&request(v), &relaxed).unwrap();
        assert_eq!(input.invoices[0].period, BillingPeriod::new(2024, 2).unwrap());
    }

    #[test]
    fn test_duplicate_tenant() {
        let mut v = base();
        v["tenants"][1]["id"] = json!(1);
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateTenant { tenant_id: TenantId(1) });
    }

    #[test]
    fn test_duplicate_tenant_utility() {
        let mut v = base();
        v["tenants"][0]["utility_percentages"]
            .as_array_mut()
            .unwrap()
            .push(json!({"utility_type": "electricity", "percentage": 5}));
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateTenantUtility { .. }));
    }

    #[test]
    fn test_multiple_general_meters() {
        let mut v = base();
        v["readings"][1]["is_general"] = json!(true);
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MultipleGeneralMeters {
                first: ReadingId(10),
                second: ReadingId(11),
            }
        );
    }

    #[test]
    fn test_overrides_validated_and_applied() {
        let mut v = base();
        v["overrides"] = json!({"2": {"electricity": "35"}});
        let input = validate_request(&request(v), &ValidationPolicy::default()).unwrap();
        assert_eq!(input.overrides.len(), 1);
        let result = input.compute().unwrap();
        assert_eq!(
            result.tenant(TenantId(2)).unwrap().lines[UtilityType::Electricity].amount,
            dec!(280)
        );
        assert_eq!(result.company_portion[UtilityType::Electricity].percentage.value(), dec!(25));
    }

    #[test]
    fn test_override_for_inactive_tenant_rejected_at_compute() {
        let mut v = base();
        v["overrides"] = json!({"3": {"electricity": 10}});
        let input = validate_request(&request(v), &ValidationPolicy::default()).unwrap();
        assert!(matches!(
            input.compute(),
            Err(CalcError::UnknownOverrideTenant { tenant_id }) if tenant_id == TenantId(3)
        ));
    }

    #[test]
    fn test_override_percentage_out_of_range() {
        let mut v = base();
        v["overrides"] = json!({"1": {"gas": 150}});
        let err = validate_request(&request(v), &ValidationPolicy::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPercentage { .. }));
    }

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(parse_decimal(&json!(12)), Some(dec!(12)));
        assert_eq!(parse_decimal(&json!(12.75)), Some(dec!(12.75)));
        assert_eq!(parse_decimal(&json!(" 3.10 ")), Some(dec!(3.10)));
        assert_eq!(parse_decimal(&json!("1.5e2")), Some(dec!(150)));
        assert_eq!(parse_decimal(&json!("")), None);
        assert_eq!(parse_decimal(&json!("NaN")), None);
        assert_eq!(parse_decimal(&json!(null)), None);
        assert_eq!(parse_decimal(&json!([1])), None);
    }

    #[test]
    fn test_max_abs_amount_is_ten_to_the_fifteenth() {
        assert_eq!(MAX_ABS_AMOUNT, Decimal::from(1_000_000_000_000_000i64));
    }

    #[test]
    fn test_policy_deserialize_defaults() {
        let policy: ValidationPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, ValidationPolicy::default());
        assert!(serde_json::from_str::<ValidationPolicy>(r#"{"allow_negatives": true}"#).is_err());
    }
}
