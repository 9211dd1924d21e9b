/// Instruction prepended to every candidate sent for summarization.
pub const EVENT_PROMPT: &str = "You are an AI assistant that extracts calendar events from unstructured text. \
Identify obligations, deadlines, payments, or submissions and output in the following format, and nothing else:\n\
event: [title]\n\
type: [type]\n\
summary: [long summary]\n\
date: [ISO 8601 date]\n\n\
Process the following text:\n\n";

pub fn build_prompt(text: &str) -> String {
    format!("{EVENT_PROMPT}{text}")
}
