use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The resolved value of a date that has no frame yet
pub const UNRESOLVED: u64 = u64::MAX;

static NEXT_DATE_ID: AtomicU64 = AtomicU64::new(1);

enum DateKind {
    Immediate,
    Absolute(u64),
    Relative(SymbolicDate, i64),
    Deferred(AtomicU64),
}

struct Inner {
    id: u64,
    kind: DateKind,
}

/// A scheduling date that may not be a concrete frame yet
///
/// Dates form a small expression tree: a date can be an absolute frame,
/// "as soon as possible", an offset from another date, or a deferred slot
/// filled in later from the control thread. A deferred date that has not
/// been set resolves to [`UNRESOLVED`], which never falls inside a cycle,
/// so commands hanging off it simply wait.
#[derive(Clone)]
pub struct SymbolicDate {
    inner: Arc<Inner>,
}

impl SymbolicDate {
    fn with_kind(kind: DateKind) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_DATE_ID.fetch_add(1, Ordering::Relaxed),
                kind,
            }),
        }
    }

    /// A date that resolves to the current frame of whatever cycle looks
    /// at it
    pub fn immediate() -> Self {
        Self::with_kind(DateKind::Immediate)
    }

    /// A concrete frame
    pub fn absolute(frame: u64) -> Self {
        Self::with_kind(DateKind::Absolute(frame))
    }

    /// A date a signed frame offset away from another date
    pub fn offset_from(base: &SymbolicDate, offset: i64) -> Self {
        Self::with_kind(DateKind::Relative(base.clone(), offset))
    }

    /// A date to be filled in later with [`SymbolicDate::set`]
    pub fn deferred() -> Self {
        Self::with_kind(DateKind::Deferred(AtomicU64::new(UNRESOLVED)))
    }

    /// Fill in a deferred date; has no effect on other kinds
    pub fn set(&self, frame: u64) {
        if let DateKind::Deferred(slot) = &self.inner.kind {
            slot.store(frame, Ordering::Release);
        }
    }

    /// The concrete frame this date was built around, when it has one
    /// without resolution
    pub fn fixed_frame(&self) -> Option<u64> {
        match &self.inner.kind {
            DateKind::Absolute(frame) => Some(*frame),
            _ => None,
        }
    }

    /// Resolve to a concrete frame, memoizing in `cache` so every command
    /// in a cycle sees the same value
    pub fn resolve(&self, now: u64, cache: &mut DateCache) -> u64 {
        if let Some(frame) = cache.map.get(&self.inner.id) {
            return *frame;
        }

        let frame = match &self.inner.kind {
            DateKind::Immediate => now,
            DateKind::Absolute(frame) => *frame,
            DateKind::Relative(base, offset) => {
                let base_frame = base.resolve(now, cache);
                if base_frame == UNRESOLVED {
                    UNRESOLVED
                } else {
                    base_frame.saturating_add_signed(*offset)
                }
            }
            DateKind::Deferred(slot) => slot.load(Ordering::Acquire),
        };

        cache.map.insert(self.inner.id, frame);
        frame
    }
}

/// Per-cycle memoization of resolved dates
///
/// Cleared at the top of every cycle so dates that depend on the current
/// frame resolve exactly once per cycle.
#[derive(Default)]
pub struct DateCache {
    map: HashMap<u64, u64>,
}

impl DateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
