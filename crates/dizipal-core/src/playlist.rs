//! Playlist emission
//!
//! Output shape:
//!
//! ```text
//! #EXTM3U
//!
//! # CATEGORY: DİZİLER
//! #EXTINF:-1, Leyla S01E01
//! https://dizipal1222.com/dizi/leyla/sezon-1/bolum-1
//! ```

use crate::config::PlaylistLimits;
use crate::types::{Catalog, ContentKind, Section, SectionGroup};

/// First line of every playlist.
pub const M3U_HEADER: &str = "#EXTM3U";

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "dizipal.m3u";

impl PlaylistLimits {
    /// Ceiling for one section.
    pub fn cap_for(&self, section: &Section) -> usize {
        match (section.group, section.kind) {
            (SectionGroup::Platform, _) => self.platform,
            (SectionGroup::Content, ContentKind::Film) => self.films,
            (SectionGroup::Content, _) => self.series,
        }
    }
}

/// Render a catalog as an M3U-like document.
///
/// Sections come in catalog order; each keeps at most its cap of entries,
/// in page URL order. Empty sections are skipped.
pub fn emit(catalog: &Catalog, limits: &PlaylistLimits) -> String {
    let mut lines: Vec<String> = vec![M3U_HEADER.to_string()];

    for section in catalog.sections().filter(|s| !s.is_empty()) {
        lines.push(String::new());
        lines.push(format!("# CATEGORY: {}", section.label));
        for entry in section.entries().take(limits.cap_for(section)) {
            lines.push(format!("#EXTINF:-1, {}", entry.title));
            lines.push(entry.url.clone());
        }
    }

    let mut document = lines.join("\n");
    document.push('\n');
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Classified, PlaylistEntry, FILMS_LABEL, SERIES_LABEL};
    use std::collections::BTreeMap;

    fn fixture() -> Classified {
        Classified {
            series: vec![
                "https://dizipal1222.com/dizi/leyla/sezon-1/bolum-2".to_string(),
                "https://dizipal1222.com/dizi/leyla/sezon-1/bolum-1".to_string(),
            ],
            films: vec!["https://dizipal1222.com/film/roma".to_string()],
            platforms: BTreeMap::from([(
                "Netflix".to_string(),
                vec!["https://dizipal1222.com/film/netflix-ozel".to_string()],
            )]),
            ..Classified::default()
        }
    }

    #[test]
    fn test_emit_layout() {
        let output = emit(&Catalog::from_classified(&fixture()), &PlaylistLimits::default());
        let expected = "\
#EXTM3U

# CATEGORY: DİZİLER
#EXTINF:-1, Leyla S01E01
https://dizipal1222.com/dizi/leyla/sezon-1/bolum-1
#EXTINF:-1, Leyla S01E02
https://dizipal1222.com/dizi/leyla/sezon-1/bolum-2

# CATEGORY: FİLMLER
#EXTINF:-1, Roma
https://dizipal1222.com/film/roma

# CATEGORY: Netflix
#EXTINF:-1, Netflix Ozel
https://dizipal1222.com/film/netflix-ozel
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_emit_empty_catalog() {
        assert_eq!(emit(&Catalog::new(), &PlaylistLimits::default()), "#EXTM3U\n");
    }

    #[test]
    fn test_series_cap_truncates() {
        let series: Vec<String> = (0..1500)
            .map(|i| format!("https://dizipal1222.com/dizi/uzun-dizi/sezon-1/bolum-{}", i))
            .collect();
        let classified = Classified {
            series,
            ..Classified::default()
        };
        let output = emit(&Catalog::from_classified(&classified), &PlaylistLimits::default());
        let entries = output.lines().filter(|l| l.starts_with("#EXTINF")).count();
        let urls = output.lines().filter(|l| l.starts_with("https://")).count();
        assert_eq!(entries, 1000);
        assert_eq!(urls, 1000);
    }

    #[test]
    fn test_caps_per_section_kind() {
        let limits = PlaylistLimits {
            series: 2,
            films: 1,
            platform: 0,
        };
        let output = emit(&Catalog::from_classified(&fixture()), &limits);
        assert_eq!(output.matches("#EXTINF").count(), 3);
        // a capped-out section still gets its header
        assert!(output.contains("# CATEGORY: Netflix"));
    }

    #[test]
    fn test_entries_keep_playable_url_and_sort_by_page() {
        let mut catalog = Catalog::new();
        catalog.insert(
            ContentKind::Film,
            FILMS_LABEL,
            "https://dizipal1222.com/film/b",
            PlaylistEntry::new("B", "https://cdn.example/a.m3u8"),
        );
        catalog.insert(
            ContentKind::Film,
            FILMS_LABEL,
            "https://dizipal1222.com/film/a",
            PlaylistEntry::new("A", "https://cdn.example/z.m3u8"),
        );
        let output = emit(&catalog, &PlaylistLimits::unlimited());
        let a = output.find("https://cdn.example/z.m3u8").unwrap();
        let b = output.find("https://cdn.example/a.m3u8").unwrap();
        assert!(a < b);
        assert!(!output.contains(SERIES_LABEL));
    }
}
