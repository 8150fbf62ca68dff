#![allow(missing_docs)]

mod common;

use std::{cell::RefCell, rc::Rc};

use common::SAMPLE;
use jsontap::{ExtractorOptions, ParserError, Segment, StreamingExtractor, pattern};
use rstest::rstest;
use serde_json::Value;

type Seen = Rc<RefCell<Vec<(String, Vec<String>)>>>;

fn collect_into(
    seen: Seen,
) -> impl FnMut(&str, &[String]) -> Result<(), jsontap::CallbackError> + 'static {
    move |text, path| {
        seen.borrow_mut().push((text.to_string(), path.to_vec()));
        Ok(())
    }
}

fn run_chunked(document: &str, chunk_size: usize, patterns: &[Vec<Segment>]) -> Vec<(String, Vec<String>)> {
    let seen = Seen::default();
    let mut parser = StreamingExtractor::new(ExtractorOptions {
        initial_buffer_capacity: document.len(),
        ..Default::default()
    });
    for pattern in patterns {
        parser.on_structure(pattern.clone(), collect_into(Rc::clone(&seen)));
    }
    for chunk in document.as_bytes().chunks(chunk_size.max(1)) {
        parser.write(chunk).expect("chunk should parse");
    }
    parser.finish().expect("document should be complete");
    Rc::try_unwrap(seen).unwrap().into_inner()
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(7)]
#[case(64)]
#[case(usize::MAX)]
fn results_extract_identically_at_any_chunk_size(#[case] chunk_size: usize) {
    let matches = run_chunked(SAMPLE, chunk_size, &[pattern!["results", "*"]]);

    let document: Value = serde_json::from_str(SAMPLE).unwrap();
    let results = document["results"].as_array().unwrap();
    assert_eq!(matches.len(), results.len());

    for (index, (text, path)) in matches.iter().enumerate() {
        assert_eq!(path, &["results".to_string(), index.to_string()]);
        let reparsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(&reparsed, &results[index]);
    }
}

#[test]
fn wildcards_span_exactly_one_level() {
    let matches = run_chunked(SAMPLE, 16, &[pattern!["facets", "*"]]);
    let paths: Vec<_> = matches.iter().map(|(_, path)| path.join(".")).collect();
    assert_eq!(paths, ["facets.language"]);

    // Depth must match exactly: nothing two levels down, nothing at one.
    assert!(run_chunked(SAMPLE, 16, &[pattern!["*", "*", "*"]])
        .iter()
        .all(|(_, path)| path.len() == 3));
}

#[test]
fn extracted_text_is_the_raw_slice() {
    let matches = run_chunked(SAMPLE, 5, &[pattern!["results", 1, "tags"]]);
    assert_eq!(matches.len(), 1);
    // The slice is byte-exact, not re-serialized.
    assert_eq!(matches[0].0, "[]");

    let pages = run_chunked(SAMPLE, 5, &[pattern!["page"]]);
    assert_eq!(
        pages[0].0,
        "{\n        \"number\": 1,\n        \"size\": 3\n    }"
    );
}

#[test]
fn several_patterns_can_watch_one_stream() {
    let seen = Seen::default();
    let mut parser = StreamingExtractor::default();
    parser
        .on_structure(pattern!["results", "*", "tags"], collect_into(Rc::clone(&seen)))
        .on_structure(pattern!["page"], collect_into(Rc::clone(&seen)))
        .on_structure(pattern!["results", "*"], collect_into(Rc::clone(&seen)));

    for chunk in SAMPLE.as_bytes().chunks(11) {
        parser.write(chunk).unwrap();
    }
    parser.finish().unwrap();

    let matches = Rc::try_unwrap(seen).unwrap().into_inner();
    let paths: Vec<_> = matches.iter().map(|(_, path)| path.join(".")).collect();
    assert_eq!(
        paths,
        [
            "page",
            "results.0.tags",
            "results.0",
            "results.1.tags",
            "results.1",
            "results.2.tags",
            "results.2",
        ]
    );
}

#[test]
fn registration_order_decides_dispatch_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut parser = StreamingExtractor::default();
    for tag in ["a", "b"] {
        let order = Rc::clone(&order);
        parser.on_structure(pattern!["page"], move |_, _| {
            order.borrow_mut().push(tag);
            Ok(())
        });
    }
    parser.write(SAMPLE.as_bytes()).unwrap();
    parser.finish().unwrap();
    assert_eq!(*order.borrow(), ["a", "b"]);
}

#[test]
fn truncated_stream_fails_finish() {
    let mut parser = StreamingExtractor::default();
    let body = SAMPLE.trim_end();
    parser
        .write(&body.as_bytes()[..body.len() - 1])
        .unwrap();
    assert!(matches!(
        parser.finish(),
        Err(ParserError::UnexpectedEndOfInput)
    ));
}

#[test]
fn callback_failures_surface_to_the_writer() {
    let mut parser = StreamingExtractor::default();
    parser.on_structure(pattern!["page"], |_, _| Err("page rejected".into()));
    let err = parser.write(SAMPLE.as_bytes()).unwrap_err();
    assert!(matches!(err, ParserError::Callback(_)));
    assert!(err.to_string().contains("callback"));
}

#[test]
fn documents_without_matches_parse_clean() {
    let matches = run_chunked(SAMPLE, 8, &[pattern!["missing", "*"]]);
    assert!(matches.is_empty());
}
