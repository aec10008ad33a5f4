use futures::future::join_all;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::ports::HttpClientPort;
use super::sort::sort_artworks;
use crate::apis::SourceAdapter;
use crate::error::Result;
use crate::metrics;
use crate::types::{
    total_pages, ArtworkPage, FetchParams, NormalizedArtwork, RawArtworkData, RequestSpec,
    SortOrder, SourcePage,
};

/// One upstream result stream: an adapter's base request, addressed by offset
struct Stream<'a> {
    adapter: &'a dyn SourceAdapter,
    base: RequestSpec,
    /// Descending order is served by addressing the ascending stream from its end
    from_end: bool,
}

impl Stream<'_> {
    /// Map a range in requested order onto the upstream's ascending offsets
    fn ascending(&self, range: Range<u64>, total: u64) -> Range<u64> {
        if self.from_end {
            total.saturating_sub(range.end)..total.saturating_sub(range.start)
        } else {
            range
        }
    }
}

/// Records fetched for one stream and the ascending offsets they cover
struct Fetched {
    range: Range<u64>,
    records: Vec<RawArtworkData>,
    total: u64,
}

/// Runs one logical query against every source adapter and returns a single
/// merged, sorted page.
pub struct Aggregator {
    pub(crate) adapters: Vec<Arc<dyn SourceAdapter>>,
    pub(crate) http: Arc<dyn HttpClientPort>,
    page_size: usize,
    max_source_window: usize,
}

impl Aggregator {
    pub fn new(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        http: Arc<dyn HttpClientPort>,
        page_size: usize,
        max_source_window: usize,
    ) -> Self {
        Self {
            adapters,
            http,
            page_size: page_size.max(1),
            max_source_window: max_source_window.max(1),
        }
    }

    /// List one page of artworks across all sources.
    ///
    /// While `page * page_size` fits in the per-source window, every source is
    /// asked for its first `page * page_size` records and the merge is sorted
    /// as a whole. Deeper pages are cut from each source at native offsets,
    /// sharing the page evenly between sources that still have records, so
    /// every page up to `totalPages` is reachable.
    ///
    /// A failing source contributes no records and no total; this never fails
    /// as a whole.
    #[instrument(skip(self, params), fields(page = params.page, sort = ?params.sort_by))]
    pub async fn list_artworks(&self, params: &FetchParams) -> ArtworkPage {
        let page = u64::from(params.page.max(1));
        let size = self.page_size as u64;

        let streams: Vec<Stream<'_>> = self
            .adapters
            .iter()
            .flat_map(|adapter| {
                let from_end = params.sort_by.is_some()
                    && params.sort_order == SortOrder::Desc
                    && !adapter.sorts_descending();
                adapter
                    .build_queries(params)
                    .into_iter()
                    .map(move |base| Stream {
                        adapter: adapter.as_ref(),
                        base,
                        from_end,
                    })
            })
            .collect();

        // First pass plans as if every stream were unbounded. A stream planned
        // empty still asks for one record to learn its total.
        let guesses = self.plan(page, &vec![u64::MAX; streams.len()]);
        let first = join_all(streams.iter().zip(guesses).map(|(stream, range)| {
            let range = if range.is_empty() { 0..1 } else { range };
            self.fetch_range(stream, range)
        }))
        .await;

        // Second pass re-plans with the reported totals and refetches what moved
        let totals: Vec<u64> = first
            .iter()
            .map(|f| f.as_ref().map_or(0, |f| f.total))
            .collect();
        let plan = self.plan(page, &totals);
        let slices = join_all(streams.iter().zip(first).zip(plan).map(
            |((stream, fetched), wanted)| async move {
                let Some(fetched) = fetched else {
                    return None;
                };
                let wanted = stream.ascending(wanted, fetched.total);
                if wanted.is_empty() {
                    return Some(Fetched {
                        range: wanted,
                        records: Vec::new(),
                        total: fetched.total,
                    });
                }
                if fetched.range == wanted {
                    return Some(fetched);
                }
                debug!(
                    source = stream.adapter.tag(),
                    from = wanted.start,
                    to = wanted.end,
                    "Refetching re-planned slice"
                );
                self.fetch_range(stream, wanted).await
            },
        ))
        .await;

        // Per-tag result sets are unioned by id, totals summed
        let mut seen = HashSet::new();
        let mut artworks = Vec::new();
        let mut total = 0u64;
        for (stream, slice) in streams.iter().zip(slices) {
            let Some(slice) = slice else {
                continue;
            };
            total = total.saturating_add(slice.total);
            for record in &slice.records {
                if let Some(artwork) = stream.adapter.normalize(record) {
                    if seen.insert(artwork.id.clone()) {
                        artworks.push(artwork);
                    }
                }
            }
        }

        if let Some(sort_by) = params.sort_by {
            sort_artworks(&mut artworks, sort_by, params.sort_order);
        }

        let start = if self.within_window(page) {
            (page - 1) * size
        } else {
            0
        };
        let artworks: Vec<NormalizedArtwork> = artworks
            .into_iter()
            .skip(start as usize)
            .take(self.page_size)
            .collect();

        info!(returned = artworks.len(), total, "Combined artwork page ready");

        ArtworkPage {
            artworks,
            total,
            total_pages: total_pages(total, self.page_size),
            current_page: params.page.max(1),
        }
    }

    fn within_window(&self, page: u64) -> bool {
        page.saturating_mul(self.page_size as u64) <= self.max_source_window as u64
    }

    /// Offset range each stream contributes to `page`, in requested order
    fn plan(&self, page: u64, totals: &[u64]) -> Vec<Range<u64>> {
        let end = page.saturating_mul(self.page_size as u64);
        if self.within_window(page) {
            return totals.iter().map(|total| 0..end.min(*total)).collect();
        }
        let start = end - self.page_size as u64;
        water_fill(start, totals)
            .into_iter()
            .zip(water_fill(end, totals))
            .map(|(from, to)| from..to)
            .collect()
    }

    async fn fetch_range(&self, stream: &Stream<'_>, range: Range<u64>) -> Option<Fetched> {
        let limit = (range.end - range.start) as usize;
        let paged = stream.adapter.page_request(&stream.base, range.start, limit);
        let pages = join_all(
            paged
                .requests
                .iter()
                .map(|spec| self.fetch_page(stream.adapter, spec)),
        )
        .await;

        let mut total = None;
        let mut records = Vec::new();
        for page in pages {
            let page = page?;
            total.get_or_insert(page.total);
            records.extend(page.records);
        }
        let total = total?;

        Some(Fetched {
            range: range.start.min(total)..range.end.min(total),
            records: records
                .into_iter()
                .skip(paged.skip)
                .take(paged.limit)
                .collect(),
            total,
        })
    }

    async fn fetch_page(&self, adapter: &dyn SourceAdapter, spec: &RequestSpec) -> Option<SourcePage> {
        let started = Instant::now();
        let outcome = self.request_page(adapter, spec).await;
        metrics::sources::request_duration(adapter.tag(), started.elapsed().as_secs_f64());

        match outcome {
            Ok(page) => {
                metrics::sources::request_success(adapter.tag());
                metrics::sources::records_returned(adapter.tag(), page.records.len());
                Some(page)
            }
            Err(e) => {
                metrics::sources::request_error(adapter.tag());
                warn!(
                    source = adapter.tag(),
                    museum = adapter.name(),
                    url = %spec.url,
                    error = %e,
                    "Source request failed, contributing no results"
                );
                None
            }
        }
    }

    async fn request_page(&self, adapter: &dyn SourceAdapter, spec: &RequestSpec) -> Result<SourcePage> {
        let response = self.http.get(spec).await?;
        let body = response.into_json(adapter.tag())?;
        adapter.parse_response(&body)
    }
}

/// How many of the first `n` merged records each stream supplies when streams
/// are drained evenly and an exhausted stream's share passes to the others.
/// Leftover single records go to the earliest streams. Counts never shrink as
/// `n` grows, so consecutive pages cut disjoint slices.
fn water_fill(n: u64, totals: &[u64]) -> Vec<u64> {
    let filled = |level: u64| {
        totals
            .iter()
            .fold(0u64, |acc, total| acc.saturating_add((*total).min(level)))
    };
    let n = n.min(filled(u64::MAX));

    // Highest level that does not overshoot n
    let (mut low, mut high) = (0u64, n);
    while low < high {
        let mid = low + (high - low).div_ceil(2);
        if filled(mid) <= n {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    let mut counts: Vec<u64> = totals.iter().map(|total| (*total).min(low)).collect();
    let mut rest = n - filled(low);
    for (count, total) in counts.iter_mut().zip(totals) {
        if rest == 0 {
            break;
        }
        if *total > low {
            *count += 1;
            rest -= 1;
        }
    }
    counts
}
