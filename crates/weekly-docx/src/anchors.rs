//! Heading and header-line texts the template is navigated by.

/// Section headings. A heading matches a paragraph when the trimmed texts are equal to
/// any of its spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    WeeklyObjective,
    ExecutionOutput,
    /// Parent heading above the AI section; only ever a stop.
    TransformationLog,
    AiAcceleration,
    SopProcess,
    FrictionBlockers,
    NextWeekFocus,
}

impl Anchor {
    /// Accepted spellings, canonical first.
    pub fn texts(self) -> &'static [&'static str] {
        match self {
            Anchor::WeeklyObjective => &["Weekly Objective (One Sentence)"],
            Anchor::ExecutionOutput => &["Execution & Output"],
            Anchor::TransformationLog => &[
                "The \u{201c}2X\u{201d} Transformation Log",
                "The \"2X\" Transformation Log",
            ],
            Anchor::AiAcceleration => &["AI Acceleration"],
            Anchor::SopProcess => &["SOP & Process Solidification"],
            Anchor::FrictionBlockers => &["Friction, Blockers & Ask"],
            Anchor::NextWeekFocus => &[
                "Next Week\u{2019}s Focus (Preview Only)",
                "Next Week's Focus (Preview Only)",
            ],
        }
    }

    pub fn canonical(self) -> &'static str {
        self.texts()[0]
    }

    pub fn matches(self, text: &str) -> bool {
        let text = text.trim();
        self.texts().iter().any(|candidate| candidate.trim() == text)
    }
}

/// Header lines rewritten in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    Name,
    Role,
    Week,
}

impl HeaderLine {
    pub fn prefix(self) -> &'static str {
        match self {
            HeaderLine::Name => "Name: ",
            HeaderLine::Role => "Role: ",
            HeaderLine::Week => "Week: ",
        }
    }

    /// `Name: anything`, or a bare `Name:` whose trailing space was trimmed away.
    pub fn matches(self, text: &str) -> bool {
        let text = text.trim();
        text.starts_with(self.prefix()) || text == self.prefix().trim_end()
    }
}
