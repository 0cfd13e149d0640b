//! Line-oriented view of a text tag's formatted-text representation.
//!
//! A formatted-text blob is a sequence of lines. A few of them are style
//! directives (`font 3`, `height 240`, `letterspacing -20`, `color #ff0000ff`);
//! everything else is carried through verbatim. Lines keep their original
//! terminators, so rendering an untouched parse gives back the exact input.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::StyleRun;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Font,
    Height,
    LetterSpacing,
    Color,
}

impl DirectiveKind {
    fn keyword(self) -> &'static str {
        match self {
            DirectiveKind::Font => "font",
            DirectiveKind::Height => "height",
            DirectiveKind::LetterSpacing => "letterspacing",
            DirectiveKind::Color => "color",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Font(u16),
    Height(u32),
    LetterSpacing(i32),
    Color(String),
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Font(_) => DirectiveKind::Font,
            Directive::Height(_) => DirectiveKind::Height,
            Directive::LetterSpacing(_) => DirectiveKind::LetterSpacing,
            Directive::Color(_) => DirectiveKind::Color,
        }
    }

    /// Parses a whole line (without terminator). Only exact matches count.
    fn parse(line: &str) -> Option<Directive> {
        let (keyword, value) = line.split_once(' ')?;
        match keyword {
            "font" if is_digits(value) => value.parse().ok().map(Directive::Font),
            "height" if is_digits(value) => value.parse().ok().map(Directive::Height),
            "letterspacing" => {
                let digits = value.strip_prefix('-').unwrap_or(value);
                if is_digits(digits) {
                    value.parse().ok().map(Directive::LetterSpacing)
                } else {
                    None
                }
            }
            "color" if !value.is_empty() && !value.contains('\r') => {
                Some(Directive::Color(value.to_string()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.kind().keyword();
        match self {
            Directive::Font(id) => write!(f, "{keyword} {id}"),
            Directive::Height(h) => write!(f, "{keyword} {h}"),
            Directive::LetterSpacing(s) => write!(f, "{keyword} {s}"),
            Directive::Color(c) => write!(f, "{keyword} {c}"),
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    text: String,
    ending: &'static str,
    directive: Option<Directive>,
}

impl Line {
    fn parse(raw: &str) -> Line {
        let (text, ending) = if let Some(t) = raw.strip_suffix("\r\n") {
            (t, "\r\n")
        } else if let Some(t) = raw.strip_suffix('\n') {
            (t, "\n")
        } else {
            (raw, "")
        };
        Line {
            text: text.to_string(),
            ending,
            directive: Directive::parse(text),
        }
    }

    /// Line content without its terminator.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn directive(&self) -> Option<&Directive> {
        self.directive.as_ref()
    }

    fn set_directive(&mut self, directive: Directive) {
        if self.directive.as_ref() == Some(&directive) {
            return;
        }
        self.text = directive.to_string();
        self.directive = Some(directive);
    }

    /// Replaces the content of a literal line. Returns false for directive lines.
    pub fn set_literal(&mut self, text: String) -> bool {
        if self.directive.is_some() || Directive::parse(&text).is_some() || text.contains('\n') {
            return false;
        }
        self.text = text;
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormattedText {
    lines: Vec<Line>,
}

impl FormattedText {
    pub fn parse(blob: &str) -> FormattedText {
        FormattedText {
            lines: blob.split_inclusive('\n').map(Line::parse).collect(),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [Line] {
        &mut self.lines
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push_str(line.ending);
        }
        out
    }

    /// Line indices of every directive of `kind`, in document order.
    fn positions(&self, kind: DirectiveKind) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.directive.as_ref().is_some_and(|d| d.kind() == kind))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn directives(&self, kind: DirectiveKind) -> impl Iterator<Item = &Directive> {
        self.lines
            .iter()
            .filter_map(|l| l.directive.as_ref())
            .filter(move |d| d.kind() == kind)
    }

    /// Recovers `run_count` styles. Each kind is matched to runs by its own
    /// occurrence index; missing occurrences come back as `None` and surplus
    /// occurrences are ignored.
    pub fn styles(&self, run_count: usize) -> Vec<StyleRun> {
        let heights: Vec<u32> = self
            .directives(DirectiveKind::Height)
            .filter_map(|d| match d {
                Directive::Height(h) => Some(*h),
                _ => None,
            })
            .collect();
        let spacings: Vec<i32> = self
            .directives(DirectiveKind::LetterSpacing)
            .filter_map(|d| match d {
                Directive::LetterSpacing(s) => Some(*s),
                _ => None,
            })
            .collect();
        let colors: Vec<&str> = self
            .directives(DirectiveKind::Color)
            .filter_map(|d| match d {
                Directive::Color(c) => Some(c.as_str()),
                _ => None,
            })
            .collect();

        (0..run_count)
            .map(|i| StyleRun {
                height: heights.get(i).copied(),
                letter_spacing: spacings.get(i).copied(),
                color: colors.get(i).map(|c| c.to_string()),
            })
            .collect()
    }

    /// Writes run `i`'s values into the `i`-th directive of each kind.
    /// `None` values and runs past the last directive of a kind leave the
    /// blob untouched.
    pub fn apply_styles(&mut self, runs: &[StyleRun]) {
        let heights = self.positions(DirectiveKind::Height);
        let spacings = self.positions(DirectiveKind::LetterSpacing);
        let colors = self.positions(DirectiveKind::Color);

        for (i, run) in runs.iter().enumerate() {
            if let (Some(h), Some(&at)) = (run.height, heights.get(i)) {
                self.lines[at].set_directive(Directive::Height(h));
            }
            if let (Some(s), Some(&at)) = (run.letter_spacing, spacings.get(i)) {
                self.lines[at].set_directive(Directive::LetterSpacing(s));
            }
            if let (Some(c), Some(&at)) = (&run.color, colors.get(i)) {
                self.lines[at].set_directive(Directive::Color(c.clone()));
            }
        }
    }

    pub fn font_ids(&self) -> BTreeSet<u16> {
        self.directives(DirectiveKind::Font)
            .filter_map(|d| match d {
                Directive::Font(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Points every `font <id>` directive whose id is in `old` at `new`.
    /// Returns how many lines changed.
    pub fn retarget_fonts(&mut self, old: &BTreeSet<u16>, new: u16) -> usize {
        let mut changed = 0;
        for line in &mut self.lines {
            if let Some(&Directive::Font(id)) = line.directive.as_ref()
                && id != new
                && old.contains(&id)
            {
                line.set_directive(Directive::Font(new));
                changed += 1;
            }
        }
        changed
    }
}
