//! System prompt that grounds every answer in the document text

use super::entities::Message;

/// Reply the model is told to give when the document has no answer
pub const FALLBACK_ANSWER: &str = "I don't have information about that in the document.";

/// Build the system message embedding the document text
pub fn build_system_prompt(context: &str) -> Message {
    Message::system(format!(
        "You are an expert assistant. Answer questions based solely on the following text:\n\n\
         {context}\n\n\
         If the answer is not in the text, say '{FALLBACK_ANSWER}'"
    ))
}
