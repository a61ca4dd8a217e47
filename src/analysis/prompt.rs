use crate::analysis::types::AnalysisRequest;

pub const TRANSCRIBE_PROMPT: &str = "\
You are a transcription AI. Transcribe only the English spoken content from \
the attached audio. Do not include transliterations or commentary. Respond \
with a single JSON object of the form {\"transcription\": \"<spoken text>\"} \
and nothing else.";

/// Builds the mistake-analysis prompt. Accuracy, WPM and timing are computed
/// locally, so the prompt deliberately never asks for them.
pub fn compare_prompt(request: &AnalysisRequest) -> String {
    format!(
        r#"You are a typing test evaluation expert. Compare the text a user typed against the original text and analyze the mistakes.

Original text:
"{reference}"

User-typed text:
"{typed}"

Total typing duration: {elapsed} seconds.

Perform the following and respond with a single valid JSON object, nothing else:
1. Find every discrepancy and categorize it as one of: "spelling" (misspelled words), "grammar" (grammatical errors), "punctuation" (missing, added or wrong punctuation), "omission" (original content the user left out), "substitution" (words that do not match the original).
2. "mistakes": an array of objects {{"start": <index into the original text>, "end": <index>, "type": <category>, "correction": <suggested fix, optional>}}. Omitted content must be listed here too.
3. "errorSummary": an object counting mistakes per category, e.g. {{"spelling": 3, "omission": 10}}. Use an empty object {{}} when there are no mistakes.
4. "highlightedText": an HTML rendering of the original text where every word is wrapped in a span with class "correct" (typed correctly), "incorrect" (typed wrongly), or "omitted" (not typed at all). Only mark genuine mistakes.
5. "overallRemarks": a concise assessment naming one strength and one area to improve.

Do not compute accuracy, typing speed or timing figures; they are derived elsewhere."#,
        reference = request.reference_text,
        typed = request.typed_text,
        elapsed = request.elapsed_secs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            reference_text: "The quick brown fox".to_string(),
            typed_text: "The quikc brown".to_string(),
            elapsed_secs: 12,
        }
    }

    #[test]
    fn prompt_embeds_both_texts_and_duration() {
        let p = compare_prompt(&request());
        assert!(p.contains("The quick brown fox"));
        assert!(p.contains("The quikc brown"));
        assert!(p.contains("12 seconds"));
    }

    #[test]
    fn prompt_names_all_five_categories() {
        let p = compare_prompt(&request());
        for category in ["spelling", "grammar", "punctuation", "omission", "substitution"] {
            assert!(p.contains(category), "missing category {category}");
        }
    }

    #[test]
    fn prompt_names_the_three_span_classes() {
        let p = compare_prompt(&request());
        for class in ["correct", "incorrect", "omitted"] {
            assert!(p.contains(class), "missing class {class}");
        }
    }

    #[test]
    fn prompt_never_requests_local_metrics() {
        let p = compare_prompt(&request());
        assert!(p.contains("Do not compute accuracy"));
        assert!(!p.contains("\"accuracy\""));
        assert!(!p.contains("\"typingSpeed\""));
    }
}
