//! PDF rendering of a survey and its answers using `lopdf`.
//!
//! The document is plain text on A4 pages in the built-in Helvetica font
//! with `WinAnsiEncoding`. Characters outside Latin-1 are replaced with `?`.

use inkwell_db::models::answer::SurveyAnswer;
use inkwell_db::models::survey::Survey;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::{aligned_values, ExportError};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 10;
const LINE_HEIGHT: i64 = 14;
/// Maximum characters per rendered line before wrapping.
const WRAP_WIDTH: usize = 90;

/// Lines that fit between the top and bottom margins.
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LINE_HEIGHT) as usize;

/// Render the survey, its questions and every answer as a PDF document.
pub fn render_pdf(
    survey: &Survey,
    questions: &[String],
    answers: &[SurveyAnswer],
) -> Result<Vec<u8>, ExportError> {
    let lines = layout_lines(survey, questions, answers);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for chunk in lines.chunks(LINES_PER_PAGE) {
        let page_id = add_page(&mut doc, pages_id, chunk)?;
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Add one page holding `lines` and return its object id.
fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    lines: &[String],
) -> Result<ObjectId, ExportError> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LINE_HEIGHT.into()]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
    ];
    for line in lines {
        let text = Object::string_literal(encode_latin1(line));
        operations.push(Operation::new("Tj", vec![text]));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// Build the text lines of the document, wrapped to [`WRAP_WIDTH`].
fn layout_lines(survey: &Survey, questions: &[String], answers: &[SurveyAnswer]) -> Vec<String> {
    let mut raw = vec![
        format!("Survey #{}: {}", survey.id, survey.title),
        format!("Status: {}", survey.status),
        format!("Created by: {}", survey.user_email),
        format!("Created at: {}", survey.created_at.to_rfc3339()),
    ];
    if let Some(deadline) = survey.deadline {
        raw.push(format!("Deadline: {}", deadline.to_rfc3339()));
    }
    raw.push(format!("Answers: {}", answers.len()));
    raw.push(String::new());

    raw.push("Questions".to_string());
    for (i, q) in questions.iter().enumerate() {
        raw.push(format!("{}. {}", i + 1, q));
    }

    for answer in answers {
        raw.push(String::new());
        raw.push(format!(
            "Answer #{} by {} at {}",
            answer.id,
            answer.respondent_email,
            answer.created_at.to_rfc3339()
        ));
        for (i, value) in aligned_values(answer, questions.len()).iter().enumerate() {
            raw.push(format!("  Q{}: {}", i + 1, value));
        }
    }

    raw.iter().flat_map(|l| wrap(l, WRAP_WIDTH)).collect()
}

/// Split a line into chunks of at most `width` characters, breaking on
/// whitespace where possible. Embedded newlines start a new line and a
/// segment's leading indentation is repeated on its continuation lines.
fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for segment in line.split('\n') {
        let body = segment.trim_start_matches(' ');
        let indent_len = (segment.len() - body.len()).min(width / 2);
        let indent = " ".repeat(indent_len);

        let mut current = indent.clone();
        for word in body.split(' ') {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            if current_len > indent_len && current_len + 1 + word_len > width {
                out.push(std::mem::replace(&mut current, indent.clone()));
            }
            if current.chars().count() > indent_len {
                current.push(' ');
            }
            current.push_str(word);
            while current.chars().count() > width {
                let head: String = current.chars().take(width).collect();
                let tail: String = current.chars().skip(width).collect();
                out.push(head);
                current = format!("{indent}{tail}");
            }
        }
        out.push(current);
    }
    out
}

/// Encode text as Latin-1 bytes, replacing unrepresentable characters.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    #[test]
    fn renders_a_loadable_single_page_document() {
        let survey = fixtures::survey(r#"["Where?","When?"]"#);
        let questions = vec!["Where?".to_string(), "When?".to_string()];
        let answers = vec![fixtures::answer(1, "a@example.com", r#"["Cafe","Noon"]"#)];

        let bytes = render_pdf(&survey, &questions, &answers).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_exports_span_multiple_pages() {
        let survey = fixtures::survey(r#"["Q"]"#);
        let questions = vec!["Q".to_string()];
        let answers: Vec<SurveyAnswer> = (1..=60)
            .map(|i| fixtures::answer(i, "a@example.com", r#"["yes"]"#))
            .collect();

        let bytes = render_pdf(&survey, &questions, &answers).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        let lines = layout_lines(&survey, &questions, &answers).len();
        assert_eq!(doc.get_pages().len(), lines.div_ceil(LINES_PER_PAGE));
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn layout_includes_every_answer_value() {
        let survey = fixtures::survey(r#"["Where?"]"#);
        let questions = vec!["Where?".to_string()];
        let answers = vec![fixtures::answer(9, "z@example.com", r#"["Rooftop"]"#)];

        let lines = layout_lines(&survey, &questions, &answers);
        assert!(lines.iter().any(|l| l == "1. Where?"));
        assert!(lines.iter().any(|l| l.starts_with("Answer #9 by z@example.com")));
        assert!(lines.iter().any(|l| l == "  Q1: Rooftop"));
    }

    #[test]
    fn wrap_breaks_on_whitespace() {
        let wrapped = wrap("aaa bbb ccc", 7);
        assert_eq!(wrapped, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn wrap_splits_words_longer_than_width() {
        let wrapped = wrap("abcdefghij", 4);
        assert_eq!(wrapped, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_leading_indentation() {
        assert_eq!(wrap("  Q1: Rooftop", 80), vec!["  Q1: Rooftop"]);
        assert_eq!(wrap("  aaa bbb", 6), vec!["  aaa", "  bbb"]);
    }

    #[test]
    fn wrap_honours_embedded_newlines() {
        assert_eq!(wrap("one\ntwo", 80), vec!["one", "two"]);
    }

    #[test]
    fn non_latin1_characters_become_question_marks() {
        assert_eq!(encode_latin1("café 问卷"), b"caf\xE9 ??".to_vec());
    }
}
