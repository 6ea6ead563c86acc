//! The parallel batched-matching driver: one locked candidate producer, a
//! pool of worker threads each keeping a bounded top-K heap, a merge and
//! partial sort, and a second pass that recovers highlight positions only
//! for the candidates that actually made the final cut.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Mutex;

use crate::error::Error;
use crate::highlight::{self, HighlightMode};
use crate::matcher::{MatchScratch, Matcher, MatcherOpts};
use crate::substring::MatchMode;
use crate::topk::{self, MatchRecord};

/// The maximum number of candidate bytes a worker pulls from the producer
/// lock in one go before releasing it. Keeps any one worker from holding
/// the lock so long that the others starve, while still amortizing lock
/// overhead across more than one candidate per acquisition.
const BATCH_SIZE_BYTES: usize = 8192;

/// A source of candidates the driver pulls from under its own lock.
///
/// `next` returns the candidate's raw bytes together with an opaque handle
/// the host uses to identify it; the driver never inspects `Handle` beyond
/// moving it around. Returning `Ok(None)` signals end of stream.
pub trait CandidateSource {
    type Handle: Send;

    fn next(&mut self) -> Result<Option<(Vec<u8>, Self::Handle)>, Error>;
}

/// Per-search configuration for [`ctrlp_match`].
#[derive(Debug, Clone)]
pub struct MatchRequest {
    /// Maximum number of results to return. `0` means unlimited.
    pub limit: usize,
    pub mmode: MatchMode,
    pub is_path: bool,
    pub match_cur_file: bool,
    pub cur_file: Option<Vec<u8>>,
    pub highlight_mode: HighlightMode,
    pub unicode: bool,
    /// `0` lets the driver pick `std::thread::available_parallelism()`.
    pub max_threads: usize,
    pub query_inverting_delimiter: Option<char>,
}

impl Default for MatchRequest {
    fn default() -> Self {
        Self {
            limit: 0,
            mmode: MatchMode::FullLine,
            is_path: true,
            match_cur_file: true,
            cur_file: None,
            highlight_mode: HighlightMode::None,
            unicode: true,
            max_threads: 0,
            query_inverting_delimiter: None,
        }
    }
}

/// One ranked result: the host's handle plus any highlight regex sources
/// computed for it.
#[derive(Debug)]
pub struct Match<H> {
    pub handle: H,
    pub highlight_regexes: Vec<String>,
}

/// The full response from [`ctrlp_match`]: matches in best-first order.
#[derive(Debug)]
pub struct MatchResponse<H> {
    pub matches: Vec<Match<H>>,
}

struct DriverState<S> {
    source: S,
    end_of_stream: bool,
    host_error: Option<Error>,
}

fn resolve_thread_count(max_threads: usize) -> usize {
    let available = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    if max_threads == 0 { available } else { available.min(max_threads) }.max(1)
}

/// Runs a full matching search: builds the [`crate::matcher::Matcher`],
/// spins up worker threads that pull batches from `source` under a shared
/// lock, merges each worker's bounded top-K heap, trims to `req.limit`, and
/// finally recomputes highlight positions for just the surviving matches.
pub fn ctrlp_match<S>(source: S, query: &[u8], req: MatchRequest) -> Result<MatchResponse<S::Handle>, Error>
where
    S: CandidateSource + Send,
{
    let encoding = if req.unicode { crate::strings::Encoding::Unicode } else { crate::strings::Encoding::Ascii };
    let matcher = Matcher::new(
        query,
        MatcherOpts {
            is_path: req.is_path,
            match_cur_file: req.match_cur_file,
            encoding,
            cur_file: req.cur_file.clone(),
        },
        req.query_inverting_delimiter,
    )?;

    let thread_count = resolve_thread_count(req.max_threads);
    let state = Mutex::new(DriverState { source, end_of_stream: false, host_error: None });

    let worker_results: Vec<Result<Vec<MatchRecord<S::Handle>>, String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..thread_count)
            .map(|_| scope.spawn(|| run_worker(&state, &matcher, req.mmode, req.limit)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|_| Err("worker thread panicked".to_string())))
            .collect()
    });

    {
        let mut guard = state.lock().expect("candidate producer lock poisoned");
        if let Some(err) = guard.host_error.take() {
            return Err(err);
        }
    }

    let mut merged = Vec::new();
    for result in worker_results {
        match result {
            Ok(records) => merged.extend(records),
            Err(msg) => {
                log::warn!("worker thread failed: {msg}");
                return Err(Error::Worker(msg));
            }
        }
    }

    topk::truncate_to_top_k(&mut merged, req.limit);

    let matches = recover_highlights(merged, &matcher, req.mmode, req.highlight_mode, encoding)?;

    Ok(MatchResponse { matches })
}

/// One worker's full lifetime: repeatedly lock, pull a batch, unlock, match
/// every candidate in the batch against a bounded top-K heap, and loop
/// until the stream ends or the producer reports a host error.
fn run_worker<S>(
    state: &Mutex<DriverState<S>>,
    matcher: &Matcher,
    mmode: MatchMode,
    limit: usize,
) -> Result<Vec<MatchRecord<S::Handle>>, String>
where
    S: CandidateSource + Send,
{
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut heap: BinaryHeap<Reverse<MatchRecord<S::Handle>>> = BinaryHeap::new();
        if limit > 0 {
            heap.reserve(limit + 1);
        }
        let mut scratch = MatchScratch::new();
        // Handles from the previous batch that didn't make the cut (no match,
        // or evicted from the heap). Dropped at the top of the next
        // `pull_batch`, under the producer lock, per the host's contract.
        let mut unmatched: Vec<S::Handle> = Vec::new();

        loop {
            let batch = pull_batch(state, &mut unmatched);
            let Some(batch) = batch else { break };
            if batch.is_empty() {
                continue;
            }

            for (bytes, handle) in batch {
                let Some(outcome) = matcher.match_candidate(&bytes, mmode, &mut scratch, false) else {
                    unmatched.push(handle);
                    continue;
                };
                let record = MatchRecord::new(handle, bytes, outcome.score);
                heap.push(Reverse(record));
                if limit > 0 && heap.len() > limit {
                    if let Some(Reverse(evicted)) = heap.pop() {
                        unmatched.push(evicted.handle);
                    }
                }
            }
        }

        heap.into_iter().map(|Reverse(r)| r).collect()
    }))
    .map_err(|payload| panic_message(&payload))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked with a non-string payload".to_string()
    }
}

/// Pulls up to [`BATCH_SIZE_BYTES`] worth of candidates from the shared
/// source. First drops every handle in `unmatched` (left over from the
/// caller's previous batch) while still holding the producer lock, since the
/// host may require its handle-release primitive to run single-threaded
/// with the iterator. Returns `None` once the stream is over or a host error
/// has been recorded (by this worker or another); returns `Some(vec![])` if
/// the stream ended exactly at the start of this pull.
fn pull_batch<S>(state: &Mutex<DriverState<S>>, unmatched: &mut Vec<S::Handle>) -> Option<Vec<(Vec<u8>, S::Handle)>>
where
    S: CandidateSource + Send,
{
    let mut guard = state.lock().expect("candidate producer lock poisoned");
    unmatched.clear();
    if guard.end_of_stream || guard.host_error.is_some() {
        return None;
    }

    let mut batch = Vec::new();
    let mut bytes_total = 0usize;
    loop {
        match guard.source.next() {
            Ok(Some((bytes, handle))) => {
                bytes_total += bytes.len();
                batch.push((bytes, handle));
                if bytes_total >= BATCH_SIZE_BYTES {
                    break;
                }
            }
            Ok(None) => {
                guard.end_of_stream = true;
                break;
            }
            Err(err) => {
                log::warn!("candidate producer returned an error: {err}");
                guard.host_error = Some(err);
                break;
            }
        }
    }
    log::debug!("pulled batch of {} candidates ({bytes_total} bytes)", batch.len());
    Some(batch)
}

/// Second pass: re-matches each surviving record with position recording
/// turned on, so positions are only ever computed for candidates that made
/// the final cut. A record that fails to rematch is an internal invariant
/// violation -- it already matched once during the first pass.
fn recover_highlights<H>(
    records: Vec<MatchRecord<H>>,
    matcher: &Matcher,
    mmode: MatchMode,
    highlight_mode: HighlightMode,
    encoding: crate::strings::Encoding,
) -> Result<Vec<Match<H>>, Error> {
    let mut scratch = MatchScratch::new();
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        let mut highlight_regexes = Vec::new();
        if highlight_mode != HighlightMode::None {
            let outcome = matcher.match_candidate(&record.bytes, mmode, &mut scratch, true).ok_or_else(|| {
                log::warn!("highlight pass failed to rematch a candidate that matched in the first pass");
                Error::Invariant("candidate matched in the first pass but not in the highlight pass".to_string())
            })?;
            let positions = outcome.positions.unwrap_or_default();
            highlight::emit_regexes(highlight_mode, &record.bytes, encoding, &positions, &mut highlight_regexes);
        }
        out.push(Match { handle: record.handle, highlight_regexes });
    }

    Ok(out)
}
