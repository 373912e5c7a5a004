use mealinsights_shared::{Amount, Quantity, Unit, UnitFamily};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{unit} belongs to {from} and cannot be converted to {to}")]
pub struct UnitMismatch {
    pub unit: Unit,
    pub from: UnitFamily,
    pub to: UnitFamily,
}

/// Unit Normalizer
///
/// Converts a quantity into the base unit of `target` (g, ml or piece).
///
/// Conversion table:
/// - Mass: g
/// - Volume: ml, cup = 240 ml, tbsp = 15 ml, tsp = 5 ml
/// - Count: piece
///
/// Mass and volume are never converted into each other (no density data) and
/// count never converts to anything; those cases return [`UnitMismatch`] and
/// the caller decides what to do with the line.
pub fn normalize(quantity: &Quantity, target: UnitFamily) -> Result<Amount, UnitMismatch> {
    let unit = quantity.unit();
    let family = unit.family();

    if family != target {
        return Err(UnitMismatch {
            unit,
            from: family,
            to: target,
        });
    }

    Ok(quantity.amount().clone() * unit.base_factor())
}
