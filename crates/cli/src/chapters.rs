//! chapter markers derived from the intro/outro windows of an episode.

use hianime::TimeWindow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub start_ms: i64,
    pub end_ms: i64,
    pub title: &'static str,
}

/// true when the intro/outro windows describe a monotonic timeline.
pub fn timestamps_consistent(intro: TimeWindow, outro: TimeWindow) -> bool {
    !(intro.start > intro.end
        || (intro.end > outro.start && outro.start > 0)
        || outro.start > outro.end)
}

/// derives the ordered chapter list for one episode.
///
/// `duration_ms` is the probed container duration. boundaries are
/// end-exclusive: each close subtracts one millisecond, and an "Epilogue"
/// only appears when the outro ends strictly before the file does. windows
/// are taken as-is even when inconsistent.
pub fn derive_chapters(intro: TimeWindow, outro: TimeWindow, duration_ms: i64) -> Vec<Chapter> {
    let last = duration_ms - 1;
    let mut chapters = Vec::new();
    let mut open = 0i64;

    if intro.start > 0 {
        chapters.push(Chapter {
            start_ms: open,
            end_ms: intro.start * 1000 - 1,
            title: "Prologue",
        });
        open = intro.start * 1000;
    }

    if intro.end > 0 {
        chapters.push(Chapter {
            start_ms: open,
            end_ms: intro.end * 1000 - 1,
            title: "Opening",
        });
        open = intro.end * 1000;
    }

    if outro.start > 0 {
        chapters.push(Chapter {
            start_ms: open,
            end_ms: outro.start * 1000 - 1,
            title: "Movie",
        });
        chapters.push(Chapter {
            start_ms: outro.start * 1000,
            end_ms: outro.end * 1000 - 1,
            title: "Ending",
        });
        if outro.end * 1000 - 1 < last {
            chapters.push(Chapter {
                start_ms: outro.end * 1000,
                end_ms: last,
                title: "Epilogue",
            });
        }
    } else {
        chapters.push(Chapter {
            start_ms: open,
            end_ms: last,
            title: "Movie",
        });
    }

    chapters
}

/// renders the chapter list in ffmpeg's metadata sidecar format.
pub fn render_ffmetadata(chapters: &[Chapter]) -> String {
    let mut out = String::from(";FFMETADATA1\n");

    for chapter in chapters {
        out.push_str("[CHAPTER]\nTIMEBASE=1/1000\n");
        out.push_str(&format!(
            "START={}\nEND={}\ntitle={}\n",
            chapter.start_ms, chapter.end_ms, chapter.title
        ));
    }

    out
}
