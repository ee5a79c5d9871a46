/// One entry of the DSL keyword table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub name: &'static str,
    /// Text inserted when the completion is accepted
    pub insert_text: &'static str,
    /// Short plain-text documentation shown next to the completion
    pub documentation: &'static str,
    /// Markdown shown on hover
    pub hover: &'static str,
}

/// Every keyword of the DSL.
///
/// The tokenizer's keyword rule, the completion list and the hover table are
/// all built from this slice, so adding a keyword here is the only change
/// needed to teach the shell about it.
pub const KEYWORDS: &[Keyword] = &[
    Keyword {
        name: "print",
        insert_text: "print ",
        documentation: "Print text to the output.",
        hover: "**print** - Outputs text to the console.",
    },
    Keyword {
        name: "add",
        insert_text: "add ",
        documentation: "Add two numbers: add 5 6",
        hover: "**add** - Adds two numbers. Usage: `add 5 6`",
    },
    Keyword {
        name: "let",
        insert_text: "let ",
        documentation: "Bind a value to a name: let x 5",
        hover: "**let** - Binds a value to a name. Usage: `let x 5`",
    },
    Keyword {
        name: "get",
        insert_text: "get ",
        documentation: "Read a bound value: get x",
        hover: "**get** - Reads the value bound to a name. Usage: `get x`",
    },
    Keyword {
        name: "repeat",
        insert_text: "repeat ",
        documentation: "Repeat a word multiple times: repeat hi 3",
        hover: "**repeat** - Repeats a word multiple times.",
    },
    Keyword {
        name: "uppercase",
        insert_text: "uppercase ",
        documentation: "Convert text to uppercase.",
        hover: "**uppercase** - Converts text to uppercase.",
    },
];

/// Look up a keyword by exact name
pub fn find(name: &str) -> Option<&'static Keyword> {
    KEYWORDS.iter().find(|k| k.name == name)
}

/// Keyword names in table order
pub fn names() -> impl Iterator<Item = &'static str> {
    KEYWORDS.iter().map(|k| k.name)
}
