use proptest::prelude::*;
use weather_fx::domain::weather::{Effect, map_condition_to_effect};

fn random_case(word: &str, mask: u8) -> String {
    word.chars()
        .enumerate()
        .map(|(idx, ch)| {
            if mask & (1 << (idx % 8)) != 0 {
                ch.to_ascii_uppercase()
            } else {
                ch
            }
        })
        .collect()
}

fn mentions(text: &str, words: &[&str]) -> bool {
    let lower = text.to_lowercase();
    words.iter().any(|word| lower.contains(word))
}

proptest! {
    #[test]
    fn any_rain_mention_maps_to_rain(
        prefix in "[a-zA-Z ]{0,10}",
        suffix in "[a-zA-Z ]{0,10}",
        mask in any::<u8>(),
        drizzle in any::<bool>(),
    ) {
        let word = if drizzle { "drizzle" } else { "rain" };
        let condition = format!("{prefix}{}{suffix}", random_case(word, mask));
        prop_assert_eq!(map_condition_to_effect(&condition), Effect::Rain);
    }

    #[test]
    fn snow_without_rain_maps_to_snow(
        prefix in "[a-zA-Z ]{0,10}",
        suffix in "[a-zA-Z ]{0,10}",
        mask in any::<u8>(),
    ) {
        let condition = format!("{prefix}{}{suffix}", random_case("snow", mask));
        prop_assume!(!mentions(&condition, &["rain", "drizzle"]));
        prop_assert_eq!(map_condition_to_effect(&condition), Effect::Snow);
    }

    #[test]
    fn cloud_without_precipitation_maps_to_cloud(
        prefix in "[a-zA-Z ]{0,10}",
        suffix in "[a-zA-Z ]{0,10}",
        mask in any::<u8>(),
    ) {
        let condition = format!("{prefix}{}{suffix}", random_case("cloud", mask));
        prop_assume!(!mentions(&condition, &["rain", "drizzle", "snow", "clear"]));
        prop_assert_eq!(map_condition_to_effect(&condition), Effect::Cloud);
    }

    #[test]
    fn unmatched_conditions_map_to_clear(condition in "[a-zA-Z ]{0,24}") {
        prop_assume!(!mentions(&condition, &["rain", "drizzle", "snow", "cloud"]));
        prop_assume!(condition.trim().to_lowercase() != "overcast");
        prop_assert_eq!(map_condition_to_effect(&condition), Effect::Clear);
    }
}

#[test]
fn overcast_in_any_case_maps_to_cloud() {
    for condition in ["overcast", "OVERCAST", "Overcast"] {
        assert_eq!(map_condition_to_effect(condition), Effect::Cloud);
    }
}
