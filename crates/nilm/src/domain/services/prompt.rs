//! Prompt assembly for the energy assistant

/// Fixed persona and grounding instructions placed ahead of every question
pub const ASSISTANT_PREAMBLE: &str = "You are an energy efficiency expert assistant for a NILM (Non-Intrusive Load Monitoring) dashboard.\n\
Help users understand their energy consumption, provide tips for reducing energy costs, and explain appliance efficiency.\n\
Keep responses concise and practical.";

const GROUNDING_INSTRUCTION: &str = "Use the dashboard data to provide specific recommendations and insights about the user's current energy usage.";

/// Compose the full request text: preamble, dashboard context (left out
/// entirely when empty), then the user's message.
pub fn compose_prompt(dashboard_context: &str, user_message: &str) -> String {
    let mut prompt = String::from(ASSISTANT_PREAMBLE);

    if !dashboard_context.is_empty() {
        prompt.push_str("\n\nCurrent Dashboard Data: ");
        prompt.push_str(dashboard_context);
    }

    prompt.push_str("\n\n");
    prompt.push_str(GROUNDING_INSTRUCTION);
    prompt.push_str("\n\nUser message: ");
    prompt.push_str(user_message);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_context() {
        let prompt = compose_prompt("", "How do I save energy?");

        assert!(prompt.starts_with(ASSISTANT_PREAMBLE));
        assert!(!prompt.contains("Current Dashboard Data"));
        assert!(prompt.ends_with("User message: How do I save energy?"));
    }

    #[test]
    fn test_prompt_with_context_keeps_order() {
        let prompt = compose_prompt("House 1 summary", "Is my fridge ok?");

        let preamble_at = prompt.find("energy efficiency expert").unwrap();
        let context_at = prompt.find("Current Dashboard Data: House 1 summary").unwrap();
        let message_at = prompt.find("User message: Is my fridge ok?").unwrap();
        assert!(preamble_at < context_at);
        assert!(context_at < message_at);
    }
}
