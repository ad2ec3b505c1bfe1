use serde::Serialize;

use crate::catalog::model::Food;

/// A selectable measurement unit presented to the client for a food.
#[derive(Debug, Clone, Serialize)]
pub struct UnitOption {
    pub id: String,
    pub code: String,
    pub label: String,
    pub unit_type: String,
    pub conversion_factor: f64,
}

/// The label for one serving of the food's base amount, e.g.
/// "1 serving (100 g)". This is exactly the parenthesized form
/// `format_quantity` parses back apart.
pub fn serving_label(food: &Food) -> String {
    format!("1 serving ({} {})", food.base_quantity, food.base_unit)
}

/// Selectable units for a food: always a "1 serving of the base amount"
/// option first, then the food's own catalog units. The serving option's
/// id is `<base_quantity><base_unit>` ("100g") and its conversion factor
/// is the base quantity itself.
pub fn build_unit_options(food: &Food) -> Vec<UnitOption> {
    let serving_id = format!("{}{}", food.base_quantity, food.base_unit);
    let mut options = vec![UnitOption {
        id: serving_id.clone(),
        code: "serving".into(),
        label: serving_label(food),
        unit_type: "serving".into(),
        conversion_factor: food.base_quantity,
    }];
    options.extend(
        food.units
            .iter()
            .filter(|u| u.id != serving_id)
            .map(|u| UnitOption {
                id: u.id.clone(),
                code: u.code.clone(),
                label: u.label.clone(),
                unit_type: u.unit_type.clone(),
                conversion_factor: u.conversion_factor,
            }),
    );
    options
}

/// Resolve a selectable unit by id, for turning a client's unit choice
/// into a snapshot of code/label/factor.
pub fn resolve_unit_option(food: &Food, unit_id: &str) -> Option<UnitOption> {
    build_unit_options(food).into_iter().find(|o| o.id == unit_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::FoodUnit;
    use crate::format::format_quantity;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn food() -> Food {
        Food {
            id: Uuid::new_v4(),
            name: "Greek Yogurt".into(),
            brand: Some("Fage".into()),
            calories: 97.0,
            protein: 9.0,
            carbs: 3.9,
            fat: 5.0,
            base_quantity: 100.0,
            base_unit: "g".into(),
            units: vec![FoodUnit {
                id: "g".into(),
                code: "g".into(),
                label: "g".into(),
                unit_type: "mass".into(),
                conversion_factor: 1.0,
            }],
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn serving_option_comes_first() {
        let options = build_unit_options(&food());
        assert_eq!(options[0].id, "100g");
        assert_eq!(options[0].label, "1 serving (100 g)");
        assert_eq!(options[0].conversion_factor, 100.0);
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].id, "g");
    }

    #[test]
    fn serving_label_round_trips_through_the_formatter() {
        let food = food();
        let option = &build_unit_options(&food)[0];
        let rendered = format_quantity(2.0, &option.code, &option.label, option.conversion_factor);
        assert_eq!(rendered, "2 servings, 200 g");
    }

    #[test]
    fn duplicate_serving_id_in_catalog_units_is_not_repeated() {
        let mut food = food();
        food.units.push(FoodUnit {
            id: "100g".into(),
            code: "serving".into(),
            label: "1 serving (100 g)".into(),
            unit_type: "serving".into(),
            conversion_factor: 100.0,
        });
        let options = build_unit_options(&food);
        assert_eq!(options.iter().filter(|o| o.id == "100g").count(), 1);
    }

    #[test]
    fn resolve_unit_option_finds_synthesized_and_catalog_units() {
        let food = food();
        assert!(resolve_unit_option(&food, "100g").is_some());
        assert!(resolve_unit_option(&food, "g").is_some());
        assert!(resolve_unit_option(&food, "oz").is_none());
    }
}
