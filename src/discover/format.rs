use super::{CategoryVideos, DiscoveryReport};
use crate::books::{BookRecord, Ebook};
use crate::youtube::RankedVideo;

const DESCRIPTION_PREVIEW_CHARS: usize = 160;

/// Backslash-escape characters that would break `[text](url)` link syntax.
fn escape_link_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '[' | ']' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Single line, no Markdown heading/newline breakage.
fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn preview(s: &str) -> String {
    let line = one_line(s);
    if line.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return line;
    }
    let cut: String = line.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{}…", cut.trim_end())
}

fn format_minutes(minutes: f64) -> String {
    let total = (minutes * 60.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

fn push_video(out: &mut String, rank: usize, video: &RankedVideo) {
    out.push_str(&format!(
        "{rank}. [{}]({}) — ★ {:.1} · {} views",
        escape_link_text(&one_line(&video.title)),
        video.url,
        video.rating,
        video.views
    ));
    if video.duration_minutes > 0.0 {
        out.push_str(&format!(" · {}", format_minutes(video.duration_minutes)));
    }
    out.push('\n');
    let desc = preview(&video.description);
    if !desc.is_empty() {
        out.push_str(&format!("   > {desc}\n"));
    }
}

pub fn format_videos(videos: &[RankedVideo], enabled: bool) -> String {
    if !enabled {
        return "Video search unavailable: set YOUTUBE_API_KEY to enable it.\n".to_string();
    }
    if videos.is_empty() {
        return "No results found. Try searching for another topic or skill.\n".to_string();
    }
    let mut out = String::new();
    for (i, video) in videos.iter().enumerate() {
        push_video(&mut out, i + 1, video);
    }
    out
}

pub fn format_books(books: &[BookRecord]) -> String {
    let Some(first) = books.first() else {
        return "No book recommendations available right now.\n".to_string();
    };
    let mut out = format!("_Source: {}_\n\n", first.source);
    for book in books {
        out.push_str(&format!(
            "- [{}]({}) by {}",
            escape_link_text(&one_line(&book.title)),
            book.info_link,
            book.authors.join(", ")
        ));
        if book.has_cover() {
            out.push_str(&format!(" ([cover]({}))", book.cover_image));
        } else {
            out.push_str(" (no cover)");
        }
        out.push('\n');
    }
    out
}

pub fn format_ebooks(ebooks: &[Ebook]) -> String {
    if ebooks.is_empty() {
        return "No downloadable ebooks found.\n".to_string();
    }
    let mut out = String::new();
    for ebook in ebooks {
        let links: Vec<String> = [
            ("PDF", &ebook.pdf),
            ("EPUB", &ebook.epub),
            ("Text", &ebook.text),
        ]
        .into_iter()
        .filter_map(|(label, link)| link.as_ref().map(|l| format!("[{label}]({l})")))
        .collect();
        out.push_str(&format!(
            "- {} by {}: {}\n",
            escape_link_text(&one_line(&ebook.title)),
            ebook.authors.join(", "),
            links.join(" · ")
        ));
    }
    out
}

pub fn format_report(report: &DiscoveryReport) -> String {
    let mut out = format!("# Learning resources: {}\n\n", one_line(&report.query));

    out.push_str("## Top Videos\n\n");
    out.push_str(&format_videos(&report.top_videos, report.video_search_enabled));

    if report.videos.len() > report.top_videos.len() {
        out.push_str("\n## More Videos\n\n");
        let start = report.top_videos.len();
        for (i, video) in report.videos.iter().enumerate().skip(start) {
            push_video(&mut out, i + 1, video);
        }
    }

    out.push_str("\n## Recommended Books\n\n");
    out.push_str(&format_books(&report.books));
    out
}

pub fn format_popular(sections: &[CategoryVideos], enabled: bool) -> String {
    let mut out = "# Popular Resources\n".to_string();
    for section in sections {
        out.push_str(&format!("\n## {}\n\n", section.category));
        out.push_str(&format_videos(&section.videos, enabled));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::BookSource;

    fn video(title: &str, rating: f64) -> RankedVideo {
        RankedVideo {
            id: "id".into(),
            title: title.into(),
            description: "line one\nline two".into(),
            thumbnail: String::new(),
            url: "https://www.youtube.com/watch?v=id".into(),
            provider: "YouTube",
            category: "Educational",
            summary: String::new(),
            view_count: 2_000_000,
            like_count: 0,
            dislike_count: 0,
            views: "2.0M".into(),
            rating,
            duration: "PT1H2M3S".into(),
            duration_minutes: 62.05,
        }
    }

    fn book(cover: &str) -> BookRecord {
        BookRecord {
            title: "SICP".into(),
            authors: vec!["Abelson".into(), "Sussman".into()],
            cover_image: cover.into(),
            info_link: "https://example.org/sicp".into(),
            source: BookSource::OpenLibrary,
        }
    }

    #[test]
    fn escapes_link_brackets() {
        assert_eq!(escape_link_text("a[b](c)"), r"a\[b\]\(c\)");
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "word ".repeat(100);
        let p = preview(&long);
        assert!(p.ends_with('…'));
        assert!(p.chars().count() <= DESCRIPTION_PREVIEW_CHARS + 1);
    }

    #[test]
    fn minutes_render_as_clock() {
        assert_eq!(format_minutes(62.05), "1:02:03");
        assert_eq!(format_minutes(0.75), "0:45");
    }

    #[test]
    fn video_line_has_rating_views_and_duration() {
        let text = format_videos(&[video("Rust [intro]", 8.5)], true);
        assert!(text.contains(r"[Rust \[intro\]](https://www.youtube.com/watch?v=id)"));
        assert!(text.contains("★ 8.5"));
        assert!(text.contains("2.0M views"));
        assert!(text.contains("1:02:03"));
        assert!(text.contains("> line one line two"));
    }

    #[test]
    fn empty_and_disabled_states_are_explicit() {
        assert!(format_videos(&[], true).contains("No results found"));
        assert!(format_videos(&[], false).contains("YOUTUBE_API_KEY"));
        assert!(format_books(&[]).contains("No book recommendations"));
        assert!(format_ebooks(&[]).contains("No downloadable ebooks"));
    }

    #[test]
    fn books_show_source_and_cover_placeholder() {
        let text = format_books(&[book(""), book("https://covers.example/1.jpg")]);
        assert!(text.starts_with("_Source: OpenLibrary_"));
        assert!(text.contains("by Abelson, Sussman (no cover)"));
        assert!(text.contains("([cover](https://covers.example/1.jpg))"));
    }

    #[test]
    fn ebooks_list_available_formats() {
        let text = format_ebooks(&[Ebook {
            title: "Walden".into(),
            authors: vec!["Thoreau".into()],
            pdf: None,
            epub: Some("https://g.org/w.epub".into()),
            text: Some("https://g.org/w.txt".into()),
        }]);
        assert!(text.contains("[EPUB](https://g.org/w.epub) · [Text](https://g.org/w.txt)"));
        assert!(!text.contains("PDF"));
    }

    #[test]
    fn report_splits_top_and_more() {
        let report = DiscoveryReport {
            query: "rust\nlang".into(),
            video_search_enabled: true,
            videos: vec![video("One", 9.0), video("Two", 8.0), video("Three", 7.0)],
            top_videos: vec![video("One", 9.0)],
            books: vec![book("")],
        };
        let text = format_report(&report);
        assert!(text.starts_with("# Learning resources: rust lang\n"));
        assert!(text.contains("## Top Videos"));
        assert!(text.contains("## More Videos"));
        assert!(text.contains("2. [Two]"));
        assert!(text.contains("3. [Three]"));
        assert!(text.contains("## Recommended Books"));
    }

    #[test]
    fn popular_has_one_section_per_category() {
        let sections = vec![
            CategoryVideos {
                category: "Web Development",
                query: "web development tutorial",
                videos: vec![video("HTML basics", 7.5)],
            },
            CategoryVideos {
                category: "Data Science",
                query: "data science tutorial",
                videos: Vec::new(),
            },
        ];
        let text = format_popular(&sections, true);
        assert!(text.starts_with("# Popular Resources\n"));
        assert!(text.contains("## Web Development\n\n1. [HTML basics]"));
        assert!(text.contains("## Data Science\n\nNo results found"));
    }
}
