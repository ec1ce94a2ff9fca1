//! # merge
//!
//! why: each node logs in its own order, the trace needs one global order
//! relations: consumes trace-log sources, feeds translate.rs through pipeline.rs
//! what: Timestamped trait, lazy k-way merge over fallible streams

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Anything the merge can order.
pub trait Timestamped {
    type Timestamp: Ord;

    fn timestamp(&self) -> &Self::Timestamp;
}

/// The head item of one source, waiting in the heap.
struct Head<T> {
    item: T,
    source: usize,
}

impl<T: Timestamped> PartialEq for Head<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Timestamped> Eq for Head<T> {}

impl<T: Timestamped> Ord for Head<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed for min-heap behavior: earliest timestamp, then lowest source
        other
            .item
            .timestamp()
            .cmp(self.item.timestamp())
            .then_with(|| other.source.cmp(&self.source))
    }
}

impl<T: Timestamped> PartialOrd for Head<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Iterator returned by [`merge_streams`].
///
/// Holds at most one item per source. Ties between sources go to the lower
/// source index; within a source, items keep their order. The first error
/// pulled from any source is yielded and ends the merge.
pub struct MergedStreams<I, T> {
    sources: Vec<I>,
    heap: BinaryHeap<Head<T>>,
    primed: bool,
    done: bool,
}

/// Merge streams that are each sorted by timestamp into one sorted stream.
pub fn merge_streams<I, T, E>(sources: Vec<I>) -> MergedStreams<I, T>
where
    I: Iterator<Item = Result<T, E>>,
    T: Timestamped,
{
    let capacity = sources.len();
    MergedStreams {
        sources,
        heap: BinaryHeap::with_capacity(capacity),
        primed: false,
        done: false,
    }
}

impl<I, T, E> MergedStreams<I, T>
where
    I: Iterator<Item = Result<T, E>>,
    T: Timestamped,
{
    /// Pull the next item of `source` into the heap.
    fn refill(&mut self, source: usize) -> Result<(), E> {
        if let Some(next) = self.sources[source].next() {
            self.heap.push(Head { item: next?, source });
        }
        Ok(())
    }
}

impl<I, T, E> Iterator for MergedStreams<I, T>
where
    I: Iterator<Item = Result<T, E>>,
    T: Timestamped,
{
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.primed {
            self.primed = true;
            for source in 0..self.sources.len() {
                if let Err(e) = self.refill(source) {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        let Some(Head { item, source }) = self.heap.pop() else {
            self.done = true;
            return None;
        };

        if let Err(e) = self.refill(source) {
            self.done = true;
            return Some(Err(e));
        }

        Some(Ok(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        at: u32,
        tag: &'static str,
    }

    impl Timestamped for Item {
        type Timestamp = u32;

        fn timestamp(&self) -> &u32 {
            &self.at
        }
    }

    fn source(items: &[(u32, &'static str)]) -> std::vec::IntoIter<Result<Item, String>> {
        items
            .iter()
            .map(|&(at, tag)| Ok(Item { at, tag }))
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn tags(sources: Vec<std::vec::IntoIter<Result<Item, String>>>) -> Vec<&'static str> {
        merge_streams(sources).map(|r| r.unwrap().tag).collect()
    }

    #[test]
    fn merges_by_timestamp() {
        let merged = tags(vec![
            source(&[(1, "a1"), (4, "a4"), (9, "a9")]),
            source(&[(2, "b2"), (3, "b3")]),
            source(&[(5, "c5")]),
        ]);
        assert_eq!(merged, ["a1", "b2", "b3", "a4", "c5", "a9"]);
    }

    #[test]
    fn ties_go_to_lower_source() {
        let merged = tags(vec![
            source(&[(1, "a1"), (2, "a2")]),
            source(&[(1, "b1"), (2, "b2")]),
        ]);
        assert_eq!(merged, ["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn equal_timestamps_within_source_keep_order() {
        let merged = tags(vec![
            source(&[(3, "b3")]),
            source(&[(1, "first"), (1, "second"), (1, "third")]),
        ]);
        assert_eq!(merged, ["first", "second", "third", "b3"]);
    }

    #[test]
    fn empty_sources() {
        assert!(tags(vec![]).is_empty());
        assert_eq!(tags(vec![source(&[]), source(&[(1, "x")])]), ["x"]);
    }

    #[test]
    fn error_ends_the_merge() {
        let failing = vec![
            Ok(Item { at: 2, tag: "b2" }),
            Err("bad line".to_string()),
            Ok(Item { at: 9, tag: "b9" }),
        ]
        .into_iter();
        let mut merged = merge_streams(vec![source(&[(1, "a1"), (5, "a5")]), failing]);

        assert_eq!(merged.next().unwrap().unwrap().tag, "a1");
        // pulling b2 refills source 1, which fails
        assert_eq!(merged.next().unwrap().unwrap_err(), "bad line");
        assert!(merged.next().is_none());
    }

    #[test]
    fn is_lazy() {
        use std::cell::Cell;
        use std::rc::Rc;

        let pulled = Rc::new(Cell::new(0));
        let counter = pulled.clone();
        let endless = (0u32..).map(move |at| {
            counter.set(counter.get() + 1);
            Ok::<_, String>(Item { at, tag: "n" })
        });

        let first: Vec<_> = merge_streams(vec![endless]).take(3).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(pulled.get(), 4);
    }
}
