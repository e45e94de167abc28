//! crates/bible_study_core/src/distribution.rs
//!
//! The reading distribution engine: partitions a validated scripture range
//! into N daily assignments, preserving canonical order with no gaps,
//! overlaps, or empty days.

use crate::bible::BibleIndex;
use crate::domain::ReadingUnit;
use crate::range::NormalizedRange;

/// One day's slice of the range before any calendar stamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAssignment {
    /// 1-based, contiguous.
    pub day_number: u32,
    pub readings: Vec<ReadingUnit>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DistributionError {
    #[error("Range contains no chapters")]
    EmptyRange,
    #[error("Day count must be positive, got {0}")]
    InvalidDays(i64),
}

/// Flattens the range into the unit sequence: every `(book, chapter)` pair
/// it contains, in canonical order.
fn unit_sequence<'a>(index: &'a BibleIndex, range: &NormalizedRange) -> Vec<(&'a str, u32)> {
    // Orders are guaranteed present for a normalized range.
    let (Some(start_order), Some(end_order)) = (
        index.order_of(&range.start_book),
        index.order_of(&range.end_book),
    ) else {
        return Vec::new();
    };
    if start_order > end_order {
        return Vec::new();
    }

    let mut units = Vec::new();
    for book in index.books_between(start_order, end_order) {
        let first = if book.order == start_order {
            range.start_chapter
        } else {
            1
        };
        let last = if book.order == end_order {
            range.end_chapter
        } else {
            book.chapter_count
        };
        for chapter in first..=last {
            units.push((book.id.as_str(), chapter));
        }
    }
    units
}

/// Coalesces one bucket of consecutive `(book, chapter)` units into
/// book-scoped reading units. A run-length pass: a new unit starts whenever
/// the book changes (chapters within a bucket are already consecutive).
fn coalesce(bucket: &[(&str, u32)]) -> Vec<ReadingUnit> {
    let mut readings: Vec<ReadingUnit> = Vec::new();
    for &(book, chapter) in bucket {
        match readings.last_mut() {
            Some(unit) if unit.book_id == book => unit.end_chapter = chapter,
            _ => readings.push(ReadingUnit {
                book_id: book.to_string(),
                start_chapter: chapter,
                end_chapter: chapter,
            }),
        }
    }
    readings
}

/// Distributes a validated range across `days` daily assignments.
///
/// When `days >= total_chapters`, the output is capped at one chapter per
/// day for `total_chapters` days; no day is ever empty. Otherwise chapters
/// are split as evenly as possible, with the remainder biased toward the
/// earliest days. Pure function: identical inputs produce identical output.
pub fn distribute(
    index: &BibleIndex,
    range: &NormalizedRange,
    days: u32,
) -> Result<Vec<DayAssignment>, DistributionError> {
    if days == 0 {
        return Err(DistributionError::InvalidDays(0));
    }

    let units = unit_sequence(index, range);
    let total_chapters = units.len() as u32;
    if total_chapters == 0 {
        return Err(DistributionError::EmptyRange);
    }

    let day_count = days.min(total_chapters);
    let base = total_chapters / day_count;
    let remainder = total_chapters % day_count;

    let mut assignments = Vec::with_capacity(day_count as usize);
    let mut cursor = 0usize;
    for day_number in 1..=day_count {
        // The first `remainder` days carry one extra chapter.
        let size = if day_number <= remainder { base + 1 } else { base };
        let bucket = &units[cursor..cursor + size as usize];
        cursor += size as usize;
        assignments.push(DayAssignment {
            day_number,
            readings: coalesce(bucket),
        });
    }

    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::validate;
    use crate::domain::ScriptureRange;

    fn normalized(
        index: &BibleIndex,
        start_book: &str,
        start_chapter: u32,
        end_book: &str,
        end_chapter: u32,
    ) -> NormalizedRange {
        validate(
            index,
            &ScriptureRange {
                start_book: start_book.to_string(),
                start_chapter,
                end_book: end_book.to_string(),
                end_chapter: Some(end_chapter),
            },
        )
        .unwrap()
    }

    /// Re-enumerates a distribution result back into flat chapters.
    fn flatten(assignments: &[DayAssignment]) -> Vec<(String, u32)> {
        assignments
            .iter()
            .flat_map(|day| day.readings.iter())
            .flat_map(|unit| {
                (unit.start_chapter..=unit.end_chapter)
                    .map(|c| (unit.book_id.clone(), c))
            })
            .collect()
    }

    #[test]
    fn one_chapter_per_day_when_counts_match() {
        let index = BibleIndex::canonical();
        let range = normalized(&index, "Genesis", 1, "Genesis", 3);
        let days = distribute(&index, &range, 3).unwrap();
        assert_eq!(days.len(), 3);
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.day_number, i as u32 + 1);
            assert_eq!(
                day.readings,
                vec![ReadingUnit {
                    book_id: "Genesis".to_string(),
                    start_chapter: i as u32 + 1,
                    end_chapter: i as u32 + 1,
                }]
            );
        }
    }

    #[test]
    fn remainder_goes_to_the_earliest_days() {
        let index = BibleIndex::canonical();
        let range = normalized(&index, "Genesis", 1, "Genesis", 4);
        let days = distribute(&index, &range, 3).unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(
            days[0].readings,
            vec![ReadingUnit {
                book_id: "Genesis".to_string(),
                start_chapter: 1,
                end_chapter: 2,
            }]
        );
        assert_eq!(days[1].readings[0].start_chapter, 3);
        assert_eq!(days[1].readings[0].end_chapter, 3);
        assert_eq!(days[2].readings[0].start_chapter, 4);
        assert_eq!(days[2].readings[0].end_chapter, 4);
    }

    #[test]
    fn a_day_crossing_a_book_boundary_emits_one_unit_per_book() {
        let index = BibleIndex::canonical();
        // Genesis 50 through Exodus 2: three chapters over two days.
        let range = normalized(&index, "Genesis", 50, "Exodus", 2);
        let days = distribute(&index, &range, 2).unwrap();
        assert_eq!(days.len(), 2);
        // remainder = 1, so day 1 gets two chapters and spans the boundary.
        assert_eq!(
            days[0].readings,
            vec![
                ReadingUnit {
                    book_id: "Genesis".to_string(),
                    start_chapter: 50,
                    end_chapter: 50,
                },
                ReadingUnit {
                    book_id: "Exodus".to_string(),
                    start_chapter: 1,
                    end_chapter: 1,
                },
            ]
        );
        assert_eq!(
            days[1].readings,
            vec![ReadingUnit {
                book_id: "Exodus".to_string(),
                start_chapter: 2,
                end_chapter: 2,
            }]
        );
    }

    #[test]
    fn caps_output_when_more_days_than_chapters() {
        let index = BibleIndex::canonical();
        let range = normalized(&index, "Genesis", 1, "Genesis", 5);
        let days = distribute(&index, &range, 10).unwrap();
        assert_eq!(days.len(), 5);
        for day in &days {
            assert_eq!(day.readings.len(), 1);
            assert_eq!(day.readings[0].chapter_count(), 1);
        }
    }

    #[test]
    fn rejects_zero_days() {
        let index = BibleIndex::canonical();
        let range = normalized(&index, "Genesis", 1, "Genesis", 3);
        assert_eq!(
            distribute(&index, &range, 0),
            Err(DistributionError::InvalidDays(0))
        );
    }

    #[test]
    fn rejects_a_range_with_no_chapters() {
        // A range that slipped past validation against a different index.
        let index = BibleIndex::new([("Alpha", 3)]);
        let range = NormalizedRange {
            start_book: "Omega".to_string(),
            start_chapter: 1,
            end_book: "Omega".to_string(),
            end_chapter: 1,
        };
        assert_eq!(
            distribute(&index, &range, 2),
            Err(DistributionError::EmptyRange)
        );
    }

    #[test]
    fn reversed_range_fed_directly_is_empty() {
        let index = BibleIndex::canonical();
        let range = NormalizedRange {
            start_book: "Exodus".to_string(),
            start_chapter: 1,
            end_book: "Genesis".to_string(),
            end_chapter: 1,
        };
        assert_eq!(
            distribute(&index, &range, 3),
            Err(DistributionError::EmptyRange)
        );
    }

    #[test]
    fn covers_every_chapter_exactly_once_in_order() {
        let index = BibleIndex::canonical();
        // Genesis 40 through Leviticus 10: 11 + 40 + 10 = 61 chapters.
        let range = normalized(&index, "Genesis", 40, "Leviticus", 10);
        for days in [1, 2, 5, 7, 13, 30, 61] {
            let assignments = distribute(&index, &range, days).unwrap();
            let flat = flatten(&assignments);
            assert_eq!(flat.len(), 61, "days={days}");
            // Must match the expected enumeration position by position.
            let mut expected = Vec::new();
            for chapter in 40..=50 {
                expected.push(("Genesis".to_string(), chapter));
            }
            for chapter in 1..=40 {
                expected.push(("Exodus".to_string(), chapter));
            }
            for chapter in 1..=10 {
                expected.push(("Leviticus".to_string(), chapter));
            }
            assert_eq!(flat, expected, "days={days}");
        }
    }

    #[test]
    fn bucket_sizes_are_base_or_base_plus_one_front_loaded() {
        let index = BibleIndex::canonical();
        let range = normalized(&index, "Genesis", 1, "Genesis", 50);
        for days in 1..=50u32 {
            let assignments = distribute(&index, &range, days).unwrap();
            assert_eq!(assignments.len(), days as usize);
            let base = 50 / days;
            let remainder = 50 % days;
            for day in &assignments {
                let size: u32 = day.readings.iter().map(ReadingUnit::chapter_count).sum();
                assert!(size >= 1, "no day may be empty");
                if day.day_number <= remainder {
                    assert_eq!(size, base + 1, "days={days} day={}", day.day_number);
                } else {
                    assert_eq!(size, base, "days={days} day={}", day.day_number);
                }
            }
        }
    }

    #[test]
    fn day_numbers_are_contiguous_from_one() {
        let index = BibleIndex::canonical();
        let range = normalized(&index, "Matthew", 1, "John", 21);
        let assignments = distribute(&index, &range, 30).unwrap();
        for (i, day) in assignments.iter().enumerate() {
            assert_eq!(day.day_number, i as u32 + 1);
        }
    }

    #[test]
    fn output_is_deterministic() {
        let index = BibleIndex::canonical();
        let range = normalized(&index, "Genesis", 1, "Deuteronomy", 34);
        let first = distribute(&index, &range, 90).unwrap();
        let second = distribute(&index, &range, 90).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn single_day_plan_coalesces_each_book_into_one_unit() {
        let index = BibleIndex::new([("Alpha", 2), ("Beta", 3), ("Gamma", 1)]);
        let range = NormalizedRange {
            start_book: "Alpha".to_string(),
            start_chapter: 1,
            end_book: "Gamma".to_string(),
            end_chapter: 1,
        };
        let assignments = distribute(&index, &range, 1).unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(
            assignments[0].readings,
            vec![
                ReadingUnit {
                    book_id: "Alpha".to_string(),
                    start_chapter: 1,
                    end_chapter: 2,
                },
                ReadingUnit {
                    book_id: "Beta".to_string(),
                    start_chapter: 1,
                    end_chapter: 3,
                },
                ReadingUnit {
                    book_id: "Gamma".to_string(),
                    start_chapter: 1,
                    end_chapter: 1,
                },
            ]
        );
    }

    #[test]
    fn partial_chapters_at_both_ends_are_respected() {
        let index = BibleIndex::canonical();
        let range = normalized(&index, "Exodus", 35, "Leviticus", 4);
        // 6 + 4 = 10 chapters over 4 days: sizes 3, 3, 2, 2.
        let assignments = distribute(&index, &range, 4).unwrap();
        let flat = flatten(&assignments);
        assert_eq!(flat.first(), Some(&("Exodus".to_string(), 35)));
        assert_eq!(flat.last(), Some(&("Leviticus".to_string(), 4)));
        let sizes: Vec<u32> = assignments
            .iter()
            .map(|d| d.readings.iter().map(ReadingUnit::chapter_count).sum())
            .collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
    }
}
