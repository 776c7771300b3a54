//! reStructuredText renderer.

use super::{plural, Renderer, Report};
use chrono::NaiveDate;

pub struct RstRenderer;

fn wrap_title(title: &str, level: char) -> String {
    let underline: String = std::iter::repeat(level).take(title.chars().count()).collect();
    format!("{}\n{}\n", title, underline)
}

/// Collapse whitespace runs, newlines included, into single spaces.
fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Single-line inline text with markup characters backslash-escaped.
fn inline_text(s: &str) -> String {
    let flat = one_line(s);
    let mut out = String::with_capacity(flat.len());
    for c in flat.chars() {
        if matches!(c, '\\' | '*' | '`' | '_' | '|') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl Renderer for RstRenderer {
    fn render(&self, report: &Report<'_>, generated: NaiveDate) -> String {
        let s = &report.summary;
        let mut out = format!(
            ".. Generated by {} on {}, DO NOT MODIFY.\n\n",
            env!("CARGO_PKG_NAME"),
            generated
        );

        out.push_str(&wrap_title("Summary", '-'));
        out.push_str("PhoneLab's instrumented Android platform currently contains:\n\n");
        out.push_str(&format!("* {} tags, {} actions,\n\n", s.tags, s.actions));
        out.push_str(&format!("* ... in {} categories,\n\n", s.categories));
        out.push_str(&format!(
            "* ... added by {} institution{}.\n\n",
            s.institutions,
            plural(s.institutions)
        ));

        for cat in &report.categories {
            out.push_str("\n\n");
            out.push_str(&wrap_title(&format!("Category: {}", inline_text(cat.category)), '+'));
            for group in &cat.tags {
                out.push_str("\n\n");
                out.push_str(&wrap_title(&format!("Tag: ``{}``", one_line(group.tag)), '~'));
                out.push('\n');
                // Anonymous links: the same project appears under many tags
                for r in &group.occurrences {
                    out.push_str(&format!("#. | **Action**: ``{}``\n", one_line(&r.action)));
                    out.push_str(&format!(
                        "   | **Project**: `{} <{}>`__\n",
                        r.project.relative_path,
                        r.project.url()
                    ));
                    out.push_str(&format!(
                        "   | **File**: `{}:{} <{}>`__\n",
                        r.relative_file(),
                        r.line_number,
                        r.file_url()
                    ));
                    out.push_str(&format!(
                        "   | **Description**: {}\n\n",
                        inline_text(&r.description)
                    ));
                }
            }
        }

        out.push_str(&format!("Last updated {}\n", generated));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::{record, sample};
    use crate::report::{summarize, ReportFormat};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 3, 1).unwrap()
    }

    /// Numbers on the bullet lines of the summary section.
    fn summary_numbers(doc: &str) -> Vec<usize> {
        let start = doc.find("Summary\n").unwrap();
        let end = doc.find("Category: ").unwrap_or(doc.len());
        doc[start..end]
            .lines()
            .filter(|l| l.starts_with("* "))
            .flat_map(|l| l.split(|c: char| !c.is_ascii_digit()))
            .filter_map(|n| n.parse().ok())
            .collect()
    }

    #[test]
    fn test_wrap_title() {
        assert_eq!(wrap_title("Tag: ``x``", '~'), "Tag: ``x``\n~~~~~~~~~~\n");
    }

    #[test]
    fn test_summary_counts_round_trip() {
        let records = sample();
        let doc = Report::build(&records).render(ReportFormat::Rst, date());
        let s = summarize(&records);
        assert_eq!(
            summary_numbers(&doc),
            vec![s.tags, s.actions, s.categories, s.institutions]
        );
        assert_eq!(doc.matches("#. | **Action**").count(), records.len());
    }

    #[test]
    fn test_network_scenario() {
        let records = vec![
            record("Network", "latency-UB", "Log", 10),
            record("Network", "latency-UB", "Drop", 42),
        ];
        let doc = Report::build(&records).render(ReportFormat::Rst, date());
        assert!(doc.starts_with(".. Generated by tagdoc on 2016-03-01, DO NOT MODIFY.\n"));
        assert_eq!(doc.matches("Category: ").count(), 1);
        assert!(doc.contains("Category: Network\n+++++++++++++++++\n"));
        assert_eq!(doc.matches("Tag: ``latency-UB``\n").count(), 1);
        let drop = doc.find("**Action**: ``Drop``").unwrap();
        let log = doc.find("**Action**: ``Log``").unwrap();
        assert!(drop < log);
        assert!(doc.contains(
            "   | **File**: `core/jni/net.cpp:42 <http://platform.phone-lab.org:8080/gitweb?p=cm-shamu/platform_frameworks_base.git;a=blob;f=core/jni/net.cpp;hb=refs/heads/phonelab/cm-13.0/release-1#l42>`__\n"
        ));
        assert_eq!(summary_numbers(&doc), vec![1, 2, 1, 1]);
        assert!(doc.contains("* ... added by 1 institution.\n"));
        assert!(doc.ends_with("Last updated 2016-03-01\n"));
    }

    #[test]
    fn test_empty_report() {
        let doc = Report::build(&[]).render(ReportFormat::Rst, date());
        assert_eq!(summary_numbers(&doc), vec![0, 0, 0, 0]);
        assert!(!doc.contains("Category: "));
    }

    #[test]
    fn test_fields_stay_on_one_line() {
        let mut r = record("Network", "latency-UB", "Log\nnow", 10);
        r.description = "first\n  second *bold* `x` ref_ a|b".into();
        let records = vec![r];
        let doc = Report::build(&records).render(ReportFormat::Rst, date());
        assert!(doc.contains("#. | **Action**: ``Log now``\n"));
        assert!(doc.contains(
            "   | **Description**: first second \\*bold\\* \\`x\\` ref\\_ a\\|b\n\n"
        ));
    }
}
