//! crates/bible_study_core/src/range.rs
//!
//! Validation and normalization of caller-supplied scripture ranges.

use std::cmp::Ordering;

use crate::bible::BibleIndex;
use crate::domain::ScriptureRange;

/// A validated range with the end chapter resolved. Guaranteed to satisfy
/// `(start_book, start_chapter) <= (end_book, end_chapter)` under canonical
/// order, with both chapters inside their books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRange {
    pub start_book: String,
    pub start_chapter: u32,
    pub end_book: String,
    pub end_chapter: u32,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Unknown book: {0}")]
    UnknownBook(String),
    #[error("Chapter {chapter} is out of range for {book}")]
    InvalidChapter { book: String, chapter: u32 },
    #[error("Range end precedes range start")]
    RangeReversed,
}

/// Checks a chapter number against a book already known to the index.
fn check_chapter(index: &BibleIndex, book: &str, chapter: u32) -> Result<(), RangeError> {
    let count = index
        .chapter_count_of(book)
        .ok_or_else(|| RangeError::UnknownBook(book.to_string()))?;
    if chapter < 1 || chapter > count {
        return Err(RangeError::InvalidChapter {
            book: book.to_string(),
            chapter,
        });
    }
    Ok(())
}

/// Validates a range against the index and resolves the optional end
/// chapter. Deterministic and side-effect free.
pub fn validate(index: &BibleIndex, range: &ScriptureRange) -> Result<NormalizedRange, RangeError> {
    // Both books must exist before any chapter math.
    if index.book(&range.start_book).is_none() {
        return Err(RangeError::UnknownBook(range.start_book.clone()));
    }
    if index.book(&range.end_book).is_none() {
        return Err(RangeError::UnknownBook(range.end_book.clone()));
    }

    let end_chapter = match range.end_chapter {
        Some(c) => c,
        // Unwrap is safe per the existence check above, but stay explicit.
        None => index
            .chapter_count_of(&range.end_book)
            .ok_or_else(|| RangeError::UnknownBook(range.end_book.clone()))?,
    };

    check_chapter(index, &range.start_book, range.start_chapter)?;
    check_chapter(index, &range.end_book, end_chapter)?;

    match index.compare(
        &range.start_book,
        range.start_chapter,
        &range.end_book,
        end_chapter,
    ) {
        Some(Ordering::Greater) => Err(RangeError::RangeReversed),
        Some(_) => Ok(NormalizedRange {
            start_book: range.start_book.clone(),
            start_chapter: range.start_chapter,
            end_book: range.end_book.clone(),
            end_chapter,
        }),
        None => Err(RangeError::UnknownBook(range.start_book.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(
        start_book: &str,
        start_chapter: u32,
        end_book: &str,
        end_chapter: Option<u32>,
    ) -> ScriptureRange {
        ScriptureRange {
            start_book: start_book.to_string(),
            start_chapter,
            end_book: end_book.to_string(),
            end_chapter,
        }
    }

    #[test]
    fn accepts_a_single_chapter_range() {
        let index = BibleIndex::canonical();
        let normalized = validate(&index, &range("Genesis", 3, "Genesis", Some(3))).unwrap();
        assert_eq!(normalized.start_chapter, 3);
        assert_eq!(normalized.end_chapter, 3);
    }

    #[test]
    fn resolves_missing_end_chapter_to_last_chapter_of_end_book() {
        let index = BibleIndex::canonical();
        let normalized = validate(&index, &range("Genesis", 1, "Exodus", None)).unwrap();
        assert_eq!(normalized.end_book, "Exodus");
        assert_eq!(normalized.end_chapter, 40);
    }

    #[test]
    fn rejects_unknown_books() {
        let index = BibleIndex::canonical();
        assert_eq!(
            validate(&index, &range("Tobit", 1, "Genesis", None)),
            Err(RangeError::UnknownBook("Tobit".to_string()))
        );
        assert_eq!(
            validate(&index, &range("Genesis", 1, "Maccabees", None)),
            Err(RangeError::UnknownBook("Maccabees".to_string()))
        );
    }

    #[test]
    fn rejects_out_of_range_chapters() {
        let index = BibleIndex::canonical();
        assert_eq!(
            validate(&index, &range("Genesis", 0, "Genesis", Some(3))),
            Err(RangeError::InvalidChapter {
                book: "Genesis".to_string(),
                chapter: 0
            })
        );
        assert_eq!(
            validate(&index, &range("Genesis", 51, "Exodus", None)),
            Err(RangeError::InvalidChapter {
                book: "Genesis".to_string(),
                chapter: 51
            })
        );
        assert_eq!(
            validate(&index, &range("Genesis", 1, "Exodus", Some(41))),
            Err(RangeError::InvalidChapter {
                book: "Exodus".to_string(),
                chapter: 41
            })
        );
    }

    #[test]
    fn rejects_reversed_ranges() {
        let index = BibleIndex::canonical();
        // Reversed across books.
        assert_eq!(
            validate(&index, &range("Exodus", 5, "Genesis", Some(1))),
            Err(RangeError::RangeReversed)
        );
        // Reversed within a book.
        assert_eq!(
            validate(&index, &range("Genesis", 10, "Genesis", Some(2))),
            Err(RangeError::RangeReversed)
        );
    }

    #[test]
    fn validation_is_repeatable() {
        let index = BibleIndex::canonical();
        let input = range("Genesis", 1, "Exodus", None);
        let first = validate(&index, &input).unwrap();
        let second = validate(&index, &input).unwrap();
        assert_eq!(first, second);
    }
}
