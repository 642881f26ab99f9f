//! Data types for the Dizipal crawler
//!
//! Everything here lives for one run: the collector fills a `Collection`,
//! the classifier turns it into `Classified`, and the emitter reads a
//! `Catalog`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::title::extract_title;

/// Section label for series episodes.
pub const SERIES_LABEL: &str = "DİZİLER";

/// Section label for films.
pub const FILMS_LABEL: &str = "FİLMLER";

/// Label of a genre section, e.g. `FİLMLER - AKSIYON`.
pub fn genre_label(base: &str, genre: &str) -> String {
    format!("{} - {}", base, genre.to_uppercase())
}

/// What a content URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// `/dizi/<slug>/sezon-<n>/bolum-<m>`
    SeriesEpisode,
    /// `/film/<slug>`
    Film,
    /// Anything filed under a streaming platform
    PlatformItem,
}

/// Output group of a section. Content sections precede platform sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionGroup {
    Content,
    Platform,
}

impl From<ContentKind> for SectionGroup {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::SeriesEpisode | ContentKind::Film => SectionGroup::Content,
            ContentKind::PlatformItem => SectionGroup::Platform,
        }
    }
}

/// How content URLs are gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Read `/sitemap.xml` and its children
    Sitemap,
    /// Walk the paginated listing pages
    Crawl,
    /// Sitemap, then resolve every page to its direct stream
    Streams,
}

/// URLs gathered by a collector, deduplicated.
///
/// Platform tags record URLs found on a platform collection page; the
/// classifier files them under that platform. Genre tags record the first
/// genre listing a URL was found on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    urls: BTreeSet<String>,
    platform_tags: BTreeMap<String, String>,
    genre_tags: BTreeMap<String, String>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a URL. Returns `false` if it was already present.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    /// Add a URL found on the collection page of `platform`.
    ///
    /// The first tag a URL receives sticks.
    pub fn insert_tagged(&mut self, url: impl Into<String>, platform: &str) -> bool {
        let url = url.into();
        self.platform_tags
            .entry(url.clone())
            .or_insert_with(|| platform.to_string());
        self.urls.insert(url)
    }

    /// Add a URL found on the listing of `genre`. The first genre sticks.
    pub fn insert_genre(&mut self, url: impl Into<String>, genre: &str) -> bool {
        let url = url.into();
        self.genre_tags
            .entry(url.clone())
            .or_insert_with(|| genre.to_string());
        self.urls.insert(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Platform label the URL was tagged with, if any.
    pub fn platform_tag(&self, url: &str) -> Option<&str> {
        self.platform_tags.get(url).map(String::as_str)
    }

    /// Genre the URL was first listed under, if any.
    pub fn genre_tag(&self, url: &str) -> Option<&str> {
        self.genre_tags.get(url).map(String::as_str)
    }

    /// URLs in lexicographic order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Merge another collection into this one.
    pub fn extend(&mut self, other: Collection) {
        for (url, platform) in other.platform_tags {
            self.platform_tags.entry(url).or_insert(platform);
        }
        for (url, genre) in other.genre_tags {
            self.genre_tags.entry(url).or_insert(genre);
        }
        self.urls.extend(other.urls);
    }
}

/// Classifier output: every kept URL sits in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classified {
    /// Series episode pages, sorted
    pub series: Vec<String>,
    /// Film pages, sorted
    pub films: Vec<String>,
    /// Genre to its series episode pages, each sorted
    pub series_genres: BTreeMap<String, Vec<String>>,
    /// Genre to its film pages, each sorted
    pub film_genres: BTreeMap<String, Vec<String>>,
    /// Platform label to its pages, each sorted
    pub platforms: BTreeMap<String, Vec<String>>,
}

impl Classified {
    /// Number of URLs across all buckets.
    pub fn total(&self) -> usize {
        let bucketed = |map: &BTreeMap<String, Vec<String>>| map.values().map(Vec::len).sum::<usize>();
        self.series.len()
            + self.films.len()
            + bucketed(&self.series_genres)
            + bucketed(&self.film_genres)
            + bucketed(&self.platforms)
    }
}

/// A single playlist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Text after `#EXTINF:-1,`
    pub title: String,
    /// Page link, or the resolved stream in the stream pipeline
    pub url: String,
}

impl PlaylistEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Entry pointing at the page itself, titled from its path.
    pub fn for_page(page_url: &str) -> Self {
        Self::new(extract_title(page_url), page_url)
    }
}

/// Episode link read from a series or season page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeLink {
    /// Absolute episode page URL
    pub url: String,
    /// Display name from the episode block
    pub name: Option<String>,
    /// Season number from the episode block
    pub season: Option<u32>,
    /// Episode number within the season
    pub episode: Option<u32>,
}

impl EpisodeLink {
    /// Title for the playlist: block name plus `SxxEyy`, falling back to
    /// what the URL path says.
    pub fn display_title(&self) -> String {
        match &self.name {
            Some(name) => format!(
                "{} S{:02}E{:02}",
                name,
                self.season.unwrap_or(1),
                self.episode.unwrap_or(1)
            ),
            None => extract_title(&self.url),
        }
    }
}

/// One `# CATEGORY:` block of the playlist.
#[derive(Debug, Clone)]
pub struct Section {
    pub group: SectionGroup,
    pub label: String,
    pub kind: ContentKind,
    /// Keyed by page URL, which fixes the output order
    entries: BTreeMap<String, PlaylistEntry>,
}

impl Section {
    /// Entries ordered by page URL.
    pub fn entries(&self) -> impl Iterator<Item = &PlaylistEntry> {
        self.entries.values()
    }

    /// Page URLs with their entries, ordered by page URL.
    pub fn pages(&self) -> impl Iterator<Item = (&str, &PlaylistEntry)> {
        self.entries.iter().map(|(page, entry)| (page.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Category buckets ready for emission.
///
/// A page URL is accepted at most once across all sections, and so is a
/// playable URL.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sections: BTreeMap<(SectionGroup, String), Section>,
    seen_pages: HashSet<String>,
    seen_playable: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `entry` for `page_url` under `label`.
    ///
    /// Returns `false` when the page, or the URL the entry plays, is
    /// already somewhere in the catalog.
    pub fn insert(&mut self, kind: ContentKind, label: &str, page_url: &str, entry: PlaylistEntry) -> bool {
        if self.seen_pages.contains(page_url) || self.seen_playable.contains(&entry.url) {
            return false;
        }
        self.seen_pages.insert(page_url.to_string());
        self.seen_playable.insert(entry.url.clone());
        let group = SectionGroup::from(kind);
        self.sections
            .entry((group, label.to_string()))
            .or_insert_with(|| Section {
                group,
                label: label.to_string(),
                kind,
                entries: BTreeMap::new(),
            })
            .entries
            .insert(page_url.to_string(), entry);
        true
    }

    /// Build page-link sections from classifier output.
    pub fn from_classified(classified: &Classified) -> Self {
        let mut catalog = Catalog::new();
        for url in &classified.series {
            catalog.insert(ContentKind::SeriesEpisode, SERIES_LABEL, url, PlaylistEntry::for_page(url));
        }
        for url in &classified.films {
            catalog.insert(ContentKind::Film, FILMS_LABEL, url, PlaylistEntry::for_page(url));
        }
        for (genre, urls) in &classified.series_genres {
            let label = genre_label(SERIES_LABEL, genre);
            for url in urls {
                catalog.insert(ContentKind::SeriesEpisode, &label, url, PlaylistEntry::for_page(url));
            }
        }
        for (genre, urls) in &classified.film_genres {
            let label = genre_label(FILMS_LABEL, genre);
            for url in urls {
                catalog.insert(ContentKind::Film, &label, url, PlaylistEntry::for_page(url));
            }
        }
        for (label, urls) in &classified.platforms {
            for url in urls {
                catalog.insert(ContentKind::PlatformItem, label, url, PlaylistEntry::for_page(url));
            }
        }
        catalog
    }

    /// Sections in output order: content before platforms, then by label.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Number of entries across all sections.
    pub fn len(&self) -> usize {
        self.sections.values().map(Section::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-section counts, for logging and `--stats`.
    pub fn summary(&self) -> CatalogSummary {
        let sections: Vec<SectionSummary> = self
            .sections()
            .map(|section| SectionSummary {
                label: section.label.clone(),
                group: section.group,
                count: section.len(),
            })
            .collect();
        CatalogSummary {
            total: sections.iter().map(|s| s.count).sum(),
            sections,
        }
    }
}

/// Entry count of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub label: String,
    pub group: SectionGroup,
    pub count: usize,
}

/// Entry counts of a whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub sections: Vec<SectionSummary>,
    pub total: usize,
}
