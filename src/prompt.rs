//! Prompt templates for the summarization collaborator.
//!
//! Both templates are deterministic: same table sample and stats in, same
//! prompt out. No schema is enforced on the model's reply.

/// Prompt for the one-shot insight summary.
pub fn insight_prompt(sample_csv: &str, stats_text: &str) -> String {
    format!(
        "You are a business analyst AI.\n\
         \n\
         Here is a sample of uploaded business data in CSV:\n\
         {sample_csv}\n\
         \n\
         And here are some numerical summaries:\n\
         {stats_text}\n\
         \n\
         Please provide 5 concise and insightful observations about this data. \
         Use simple business language."
    )
}

/// Prompt for one follow-up chat question.
pub fn chat_prompt(sample_csv: &str, question: &str) -> String {
    format!(
        "You are a smart business analyst AI.\n\
         \n\
         Here is a sample of the business data in CSV:\n\
         {sample_csv}\n\
         \n\
         User asked:\n\
         {question}\n\
         \n\
         Answer clearly using this data."
    )
}
