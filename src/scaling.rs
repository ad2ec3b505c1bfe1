//! Unit scaling engine.
//!
//! Pure functions that turn (food, quantity, unit) into macro totals.
//! Everything here is fail-soft: degenerate input (missing food,
//! non-positive quantity, unknown unit, zero base amount) yields zeros,
//! never an error. Callers render `0` as a legitimate value.

use serde::{Deserialize, Serialize};

use crate::catalog::model::Food;

/// The four macro totals the tracker cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Nutrition {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }

    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

impl Food {
    fn base_nutrition(&self) -> Nutrition {
        Nutrition {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

/// Dimensionless multiplier against the food's declared base macros.
///
/// `quantity` of the unit identified by `unit_id` expressed as a multiple
/// of the food's base quantity. Returns `0.0` when the food is absent,
/// the quantity is non-positive, or `unit_id` matches none of the food's
/// units.
pub fn scale_factor(food: Option<&Food>, quantity: f64, unit_id: &str) -> f64 {
    let Some(food) = food else {
        return 0.0;
    };
    if quantity <= 0.0 || food.base_quantity <= 0.0 {
        return 0.0;
    }
    let Some(unit) = food.unit(unit_id) else {
        return 0.0;
    };
    let base_amount = quantity * unit.conversion_factor;
    base_amount / food.base_quantity
}

/// Macro totals for `quantity` of the given unit. Linear in quantity; all
/// zeros whenever [`scale_factor`] is zero.
pub fn nutrition_for(food: Option<&Food>, quantity: f64, unit_id: &str) -> Nutrition {
    let factor = scale_factor(food, quantity, unit_id);
    match food {
        Some(food) if factor != 0.0 => food.base_nutrition().scale(factor),
        _ => Nutrition::zero(),
    }
}

/// Rescale a logged item's stored totals to a new quantity/unit.
///
/// A meal item is self-describing: its macro fields are absolute totals
/// for `quantity × conversion_factor` base units, so the per-base-unit
/// rate is recovered from the item itself rather than from the original
/// food record. A zero current base amount means a degenerate row; the
/// result is all zeros, never a division error.
pub fn rescale(
    quantity: f64,
    conversion_factor: f64,
    totals: &Nutrition,
    new_quantity: f64,
    new_conversion_factor: f64,
) -> Nutrition {
    let current_base = quantity * conversion_factor;
    if current_base == 0.0 {
        return Nutrition::zero();
    }
    let new_base = new_quantity * new_conversion_factor;
    totals.scale(new_base / current_base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::FoodUnit;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn food_with_units(units: Vec<FoodUnit>) -> Food {
        Food {
            id: Uuid::new_v4(),
            name: "Oats".into(),
            brand: None,
            calories: 100.0,
            protein: 10.0,
            carbs: 5.0,
            fat: 2.0,
            base_quantity: 100.0,
            base_unit: "g".into(),
            units,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn unit(id: &str, factor: f64) -> FoodUnit {
        FoodUnit {
            id: id.into(),
            code: "serving".into(),
            label: format!("1 serving ({factor} g)"),
            unit_type: "serving".into(),
            conversion_factor: factor,
        }
    }

    #[test]
    fn scale_factor_for_valid_input() {
        let food = food_with_units(vec![unit("u1", 150.0)]);
        // (2 × 150) / 100
        assert_eq!(scale_factor(Some(&food), 2.0, "u1"), 3.0);
    }

    #[test]
    fn scale_factor_is_zero_without_food() {
        assert_eq!(scale_factor(None, 2.0, "u1"), 0.0);
    }

    #[test]
    fn scale_factor_is_zero_for_non_positive_quantity() {
        let food = food_with_units(vec![unit("u1", 150.0)]);
        assert_eq!(scale_factor(Some(&food), 0.0, "u1"), 0.0);
        assert_eq!(scale_factor(Some(&food), -1.5, "u1"), 0.0);
    }

    #[test]
    fn scale_factor_is_zero_for_unknown_unit() {
        let food = food_with_units(vec![unit("u1", 150.0)]);
        assert_eq!(scale_factor(Some(&food), 2.0, "nope"), 0.0);
    }

    #[test]
    fn nutrition_for_scales_all_four_macros() {
        let food = food_with_units(vec![unit("u1", 150.0)]);
        let n = nutrition_for(Some(&food), 2.0, "u1");
        assert_eq!(
            n,
            Nutrition {
                calories: 300.0,
                protein: 30.0,
                carbs: 15.0,
                fat: 6.0
            }
        );
    }

    #[test]
    fn nutrition_for_is_all_zero_when_factor_is_zero() {
        let food = food_with_units(vec![unit("u1", 150.0)]);
        assert_eq!(nutrition_for(Some(&food), -2.0, "u1"), Nutrition::zero());
        assert_eq!(nutrition_for(None, 2.0, "u1"), Nutrition::zero());
    }

    #[test]
    fn nutrition_for_is_linear_in_quantity() {
        let food = food_with_units(vec![unit("u1", 37.5)]);
        let once = nutrition_for(Some(&food), 1.3, "u1");
        let twice = nutrition_for(Some(&food), 2.6, "u1");
        assert!((twice.calories - 2.0 * once.calories).abs() < 1e-9);
        assert!((twice.protein - 2.0 * once.protein).abs() < 1e-9);
        assert!((twice.carbs - 2.0 * once.carbs).abs() < 1e-9);
        assert!((twice.fat - 2.0 * once.fat).abs() < 1e-9);
    }

    #[test]
    fn rescale_round_trip_doubles_totals() {
        let totals = Nutrition {
            calories: 200.0,
            protein: 12.0,
            carbs: 30.0,
            fat: 4.0,
        };
        let out = rescale(1.0, 100.0, &totals, 2.0, 100.0);
        assert_eq!(out.calories, 400.0);
        assert_eq!(out.protein, 24.0);
        assert_eq!(out.carbs, 60.0);
        assert_eq!(out.fat, 8.0);
    }

    #[test]
    fn rescale_across_units() {
        // 1 × 100 g holding 200 kcal, re-expressed as 3 × 50 g.
        let totals = Nutrition {
            calories: 200.0,
            ..Nutrition::zero()
        };
        let out = rescale(1.0, 100.0, &totals, 3.0, 50.0);
        assert_eq!(out.calories, 300.0);
    }

    #[test]
    fn rescale_is_linear_in_new_quantity() {
        let totals = Nutrition {
            calories: 170.0,
            protein: 9.0,
            carbs: 21.0,
            fat: 6.0,
        };
        let once = rescale(2.0, 30.0, &totals, 1.7, 30.0);
        let twice = rescale(2.0, 30.0, &totals, 3.4, 30.0);
        assert!((twice.calories - 2.0 * once.calories).abs() < 1e-9);
        assert!((twice.fat - 2.0 * once.fat).abs() < 1e-9);
    }

    #[test]
    fn rescale_degenerate_base_amount_yields_zeros() {
        let totals = Nutrition {
            calories: 200.0,
            protein: 10.0,
            carbs: 20.0,
            fat: 5.0,
        };
        assert_eq!(rescale(0.0, 100.0, &totals, 2.0, 100.0), Nutrition::zero());
        assert_eq!(rescale(1.0, 0.0, &totals, 2.0, 100.0), Nutrition::zero());
    }

    #[test]
    fn engine_and_rescale_agree_on_the_same_edit() {
        // Both derivation paths must produce the same totals for the same
        // target quantity when the stored snapshot was itself produced by
        // the engine.
        let food = food_with_units(vec![unit("u1", 150.0)]);
        let snapshot = nutrition_for(Some(&food), 2.0, "u1");
        let via_engine = nutrition_for(Some(&food), 5.0, "u1");
        let via_rate = rescale(2.0, 150.0, &snapshot, 5.0, 150.0);
        assert!((via_engine.calories - via_rate.calories).abs() < 1e-9);
        assert!((via_engine.protein - via_rate.protein).abs() < 1e-9);
    }
}
