//! Prompt Construction

use feature_encoder::RawInput;

/// Instruction sent as the model's system prompt
pub const SYSTEM_INSTRUCTION: &str = "You are a professional automotive copywriter. \
Your output must be formatted as a single, engaging paragraph ready for a classified ad. \
Do not include any headers, titles, or introductory phrases.";

/// User prompt describing the car and its estimated price
pub fn build_prompt(input: &RawInput, formatted_price: &str) -> String {
    format!(
        "Write a compelling and detailed used car advertisement description (maximum 150 words) \
         for a car with the following specifications: \
         Brand: {}, Body Type: {}, Drive Type: {}, Engine Size: {}cc, Horsepower: {}hp, \
         Fuel Type: {}, Aspiration: {}, Mileage: {} City / {} Highway MPG. \
         The estimated price is {}. Focus on key selling points.",
        input.brand,
        input.carbody,
        input.drivewheel,
        input.enginesize,
        input.horsepower,
        input.fueltype,
        input.aspiration,
        input.citympg,
        input.highwaympg,
        formatted_price,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_specs_and_price() {
        let prompt = build_prompt(&RawInput::default(), "$19,500.00");
        assert!(prompt.contains("Brand: mercedes"));
        assert!(prompt.contains("Body Type: convertible"));
        assert!(prompt.contains("Drive Type: 4wd"));
        assert!(prompt.contains("Engine Size: 150cc"));
        assert!(prompt.contains("Horsepower: 100hp"));
        assert!(prompt.contains("Mileage: 15 City / 20 Highway MPG"));
        assert!(prompt.contains("The estimated price is $19,500.00."));
    }
}
