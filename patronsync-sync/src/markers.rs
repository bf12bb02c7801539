//! Marker substitution engine.
//!
//! Pure text-in/text-out: the engine never performs I/O and never suppresses
//! a replacement merely because the result equals the input — write gating
//! belongs to [`crate::writer`] and change detection to the git layer.

use patronsync_core::types::MarkerSpec;

/// Result of one substitution attempt over a file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// The marker region was found; the full new file text is returned.
    Replaced(String),
    /// Either the start marker is absent, or no end marker occurs after it
    /// (which includes misordered markers). The file must be left untouched;
    /// whether this is fatal is the caller's policy decision.
    RegionNotFound,
}

/// Replace the first marker-delimited region of `text` with the joined
/// supporter names.
///
/// The region spans from the first occurrence of the start marker through
/// the first end marker occurring *after* it, inclusive of both markers and
/// of any text between them. Searching for the end strictly past the start
/// marker keeps the match minimal and well-defined even when the end marker
/// is a substring of (or identical to) the start marker. Only this first
/// pair is touched per invocation; later pairs in the same file are left
/// alone. The replacement is `start + "\n\n" + names + "\n\n" + end`, so
/// re-running on the output with the same names is byte-identical.
pub fn substitute(text: &str, spec: &MarkerSpec, names: &str) -> Substitution {
    let Some(start_at) = text.find(&spec.start) else {
        return Substitution::RegionNotFound;
    };
    let after_start = start_at + spec.start.len();
    // No end marker past the start marker covers both the missing and the
    // misordered case.
    let Some(end_rel) = text[after_start..].find(&spec.end) else {
        return Substitution::RegionNotFound;
    };
    let end_at = after_start + end_rel;

    let region_end = end_at + spec.end.len();
    let mut out = String::with_capacity(text.len() + names.len());
    out.push_str(&text[..start_at]);
    out.push_str(&spec.start);
    out.push_str("\n\n");
    out.push_str(names);
    out.push_str("\n\n");
    out.push_str(&spec.end);
    out.push_str(&text[region_end..]);
    Substitution::Replaced(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> MarkerSpec {
        MarkerSpec {
            start: "<!-- patrons -->".into(),
            end: "<!-- /patrons -->".into(),
            fail_on_missing: true,
        }
    }

    #[test]
    fn replaces_region_including_old_content() {
        let text = "# Hello\n<!-- patrons -->\nold names here\n<!-- /patrons -->\nfooter\n";
        let result = substitute(text, &spec(), "B · C");
        assert_eq!(
            result,
            Substitution::Replaced(
                "# Hello\n<!-- patrons -->\n\nB · C\n\n<!-- /patrons -->\nfooter\n".into()
            )
        );
    }

    #[test]
    fn substitution_is_idempotent() {
        let text = "a <!-- patrons --> stale <!-- /patrons --> z";
        let Substitution::Replaced(first) = substitute(text, &spec(), "B · C") else {
            panic!("expected replacement");
        };
        let Substitution::Replaced(second) = substitute(&first, &spec(), "B · C") else {
            panic!("expected replacement");
        };
        assert_eq!(first, second, "second pass must be byte-identical");
    }

    #[test]
    fn only_first_marker_pair_is_touched() {
        let text = "<!-- patrons -->one<!-- /patrons --> mid <!-- patrons -->two<!-- /patrons -->";
        let Substitution::Replaced(out) = substitute(text, &spec(), "N") else {
            panic!("expected replacement");
        };
        assert_eq!(
            out,
            "<!-- patrons -->\n\nN\n\n<!-- /patrons --> mid <!-- patrons -->two<!-- /patrons -->"
        );
    }

    #[test]
    fn missing_start_marker_is_not_found() {
        let text = "nothing to see <!-- /patrons -->";
        assert_eq!(substitute(text, &spec(), "N"), Substitution::RegionNotFound);
    }

    #[test]
    fn missing_end_marker_is_not_found() {
        let text = "<!-- patrons --> dangling";
        assert_eq!(substitute(text, &spec(), "N"), Substitution::RegionNotFound);
    }

    #[test]
    fn misordered_markers_are_not_found() {
        let text = "<!-- /patrons --> backwards <!-- patrons -->";
        assert_eq!(substitute(text, &spec(), "N"), Substitution::RegionNotFound);
    }

    #[test]
    fn identical_start_and_end_markers_stay_idempotent() {
        let same = MarkerSpec {
            start: "@@patrons@@".into(),
            end: "@@patrons@@".into(),
            fail_on_missing: true,
        };
        let text = "intro @@patrons@@ stale @@patrons@@ outro";
        let Substitution::Replaced(first) = substitute(text, &same, "B · C") else {
            panic!("expected replacement");
        };
        let Substitution::Replaced(second) = substitute(&first, &same, "B · C") else {
            panic!("expected replacement");
        };
        assert_eq!(
            first,
            "intro @@patrons@@\n\nB · C\n\n@@patrons@@ outro"
        );
        assert_eq!(first, second, "second pass must be byte-identical");
    }

    #[test]
    fn end_marker_inside_the_start_marker_does_not_close_the_region() {
        let nested = MarkerSpec {
            start: "<!-- patrons -->".into(),
            end: "-->".into(),
            fail_on_missing: true,
        };
        // The only `-->` sits inside the start marker itself, so there is
        // no region to replace.
        let text = "<!-- patrons --> dangling";
        assert_eq!(
            substitute(text, &nested, "N"),
            Substitution::RegionNotFound
        );

        // With a real closing occurrence the region ends there, and the
        // result converges on a second pass.
        let text = "<!-- patrons --> stale -->\ntail";
        let Substitution::Replaced(first) = substitute(text, &nested, "B") else {
            panic!("expected replacement");
        };
        let Substitution::Replaced(second) = substitute(&first, &nested, "B") else {
            panic!("expected replacement");
        };
        assert_eq!(first, "<!-- patrons -->\n\nB\n\n-->\ntail");
        assert_eq!(first, second);
    }

    #[test]
    fn stray_end_before_start_does_not_block_a_later_pair() {
        let text = "<!-- /patrons --> noise <!-- patrons -->x<!-- /patrons -->";
        let Substitution::Replaced(out) = substitute(text, &spec(), "N") else {
            panic!("expected replacement");
        };
        assert_eq!(
            out,
            "<!-- /patrons --> noise <!-- patrons -->\n\nN\n\n<!-- /patrons -->"
        );
    }

    #[test]
    fn empty_region_between_adjacent_markers_is_replaced() {
        let text = "<!-- patrons --><!-- /patrons -->";
        let Substitution::Replaced(out) = substitute(text, &spec(), "A") else {
            panic!("expected replacement");
        };
        assert_eq!(out, "<!-- patrons -->\n\nA\n\n<!-- /patrons -->");
    }

    #[test]
    fn empty_names_still_produce_the_canonical_shape() {
        let text = "<!-- patrons -->x<!-- /patrons -->";
        let Substitution::Replaced(out) = substitute(text, &spec(), "") else {
            panic!("expected replacement");
        };
        assert_eq!(out, "<!-- patrons -->\n\n\n\n<!-- /patrons -->");
    }
}
