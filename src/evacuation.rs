//! Evacuation plan aggregates and transport assignments.

use crate::entity::Entity;
use crate::error::{EchoError, Result};
use serde_json::{Number, Value};

/// Passengers a GR-75 medium transport carries without overloading.
pub const TRANSPORT_BASE_CAPACITY: i64 = 90;

/// A JSON number that stays integral as long as every operand is.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Quantity {
    Int(i64),
    Float(f64),
}

impl Quantity {
    fn from_value(field: &str, value: &Value) -> Result<Self> {
        let number = match value {
            Value::Number(number) => number,
            other => {
                return Err(EchoError::InvalidField {
                    field: field.to_string(),
                    reason: format!("expected a number, got {}", other),
                })
            }
        };

        Ok(match number.as_i64() {
            Some(n) => Quantity::Int(n),
            None => Quantity::Float(number.as_f64().unwrap_or(f64::NAN)),
        })
    }

    fn as_f64(self) -> f64 {
        match self {
            Quantity::Int(n) => n as f64,
            Quantity::Float(f) => f,
        }
    }

    fn add(self, other: Quantity) -> Quantity {
        match (self, other) {
            (Quantity::Int(a), Quantity::Int(b)) => match a.checked_add(b) {
                Some(n) => Quantity::Int(n),
                None => Quantity::Float(a as f64 + b as f64),
            },
            (a, b) => Quantity::Float(a.as_f64() + b.as_f64()),
        }
    }

    fn mul(self, other: Quantity) -> Quantity {
        match (self, other) {
            (Quantity::Int(a), Quantity::Int(b)) => match a.checked_mul(b) {
                Some(n) => Quantity::Int(n),
                None => Quantity::Float(a as f64 * b as f64),
            },
            (a, b) => Quantity::Float(a.as_f64() * b.as_f64()),
        }
    }

    fn into_value(self, field: &str) -> Result<Value> {
        match self {
            Quantity::Int(n) => Ok(Value::from(n)),
            Quantity::Float(f) => Number::from_f64(f).map(Value::Number).ok_or_else(|| {
                EchoError::InvalidField {
                    field: field.to_string(),
                    reason: format!("{} is not a finite number", f),
                }
            }),
        }
    }
}

/// Sum of every head count in the garrison personnel mapping.
pub fn total_personnel(personnel: &Entity) -> Result<Value> {
    personnel
        .iter()
        .try_fold(Quantity::Int(0), |total, (role, count)| -> Result<Quantity> {
            Ok(total.add(Quantity::from_value(role, count)?))
        })?
        .into_value("max_base_personnel")
}

/// `base_capacity × multiplier × available transports`
pub fn overload_capacity(base_capacity: i64, multiplier: &Value, transports: &Value) -> Result<Value> {
    let multiplier = Quantity::from_value("passenger_overload_multiplier", multiplier)?;
    let transports = Quantity::from_value("num_available", transports)?;

    Quantity::Int(base_capacity)
        .mul(multiplier)
        .mul(transports)
        .into_value("max_passenger_overload_capacity")
}

/// Fill in the plan's aggregate counters.
pub fn update_plan(
    plan: &mut Entity,
    personnel: &Entity,
    available_transports: &Value,
    base_capacity: i64,
) -> Result<()> {
    let multiplier = plan
        .get("passenger_overload_multiplier")
        .cloned()
        .ok_or_else(|| EchoError::MissingPath("/evacuation_plan/passenger_overload_multiplier".to_string()))?;

    plan.insert("max_base_personnel".to_string(), total_personnel(personnel)?);
    plan.insert("max_available_transports".to_string(), available_transports.clone());
    plan.insert("passenger_overload_multiplier".to_string(), multiplier.clone());
    plan.insert(
        "max_passenger_overload_capacity".to_string(),
        overload_capacity(base_capacity, &multiplier, available_transports)?,
    );
    Ok(())
}

/// A renamed copy of `transport` carrying passengers and escorted by crewed fighters.
pub fn transport_assignment(
    transport: &Entity,
    name: &str,
    passenger_manifest: Vec<Entity>,
    escorts: Vec<Entity>,
) -> Entity {
    let mut assignment = transport.clone();
    assignment.insert("name".to_string(), Value::String(name.to_string()));
    assignment.insert(
        "passenger_manifest".to_string(),
        Value::Array(passenger_manifest.into_iter().map(Value::Object).collect()),
    );
    assignment.insert(
        "escorts".to_string(),
        Value::Array(escorts.into_iter().map(Value::Object).collect()),
    );
    assignment
}

/// Append `assignment` to the plan's `transport_assignments`, creating the list if needed.
pub fn add_assignment(plan: &mut Entity, assignment: Entity) -> Result<()> {
    let assignments = plan
        .entry("transport_assignments")
        .or_insert_with(|| Value::Array(Vec::new()));

    match assignments {
        Value::Array(list) => {
            list.push(Value::Object(assignment));
            Ok(())
        }
        other => Err(EchoError::InvalidField {
            field: "transport_assignments".to_string(),
            reason: format!("expected a list, got {}", other),
        }),
    }
}
