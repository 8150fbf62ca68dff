#![allow(missing_docs)]

/// A paginated search response of the shape this crate is typically pointed
/// at: only a few of the nested structures are interesting, and the body
/// arrives in arbitrary network-sized chunks.
pub const SAMPLE: &str = r#"
{
    "query": "streaming json",
    "page": {
        "number": 1,
        "size": 3
    },
    "results": [
        {
            "id": 101,
            "title": "Incremental parsing",
            "tags": ["parser", "streaming"],
            "score": 0.875
        },
        {
            "id": 102,
            "title": "Chunked transfer in practice",
            "tags": [],
            "score": 0.5e1
        },
        {
            "id": 103,
            "title": "Escapes: \"quoted\", \\backslash\\ and é",
            "tags": ["unicode"],
            "score": -1
        }
    ],
    "facets": {
        "language": {
            "en": 2,
            "fr": 1
        }
    },
    "exhausted": false,
    "next": null
}
"#;
