//! Command lookup tables
//!
//! Maps argument-free commands (`\alpha`, `\leq`, `\sum`, `\sin`, `\quad`)
//! to what they produce. Commands that take arguments (`\frac`, `\sqrt`,
//! `\left`, font and accent commands) are handled by the grammar.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// What an argument-free command stands for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// Rendered as `<mi>`; `upright` for capital Greek and friends
    Identifier { text: &'static str, upright: bool },
    /// Rendered as `<mo>`
    Operator { text: &'static str, fence: bool },
    /// `\sum`, `\int`: scripts may move under/over in display style
    LargeOperator { text: &'static str, movable_limits: bool },
    /// `\sin`, `\lim`: upright name, `limits` for the ones that take
    /// under-scripts in display style
    Function { limits: bool },
    /// Horizontal space, width in em
    Space { width: &'static str },
}

/// Font styles selected by `\mathbf` and friends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontVariant {
    Normal,
    Bold,
    Italic,
    SansSerif,
    Monospace,
    Script,
    DoubleStruck,
    Fraktur,
}

impl FontVariant {
    pub fn from_command(command: &str) -> Option<Self> {
        let variant = match command {
            "\\mathrm" | "\\operatorname" => FontVariant::Normal,
            "\\mathbf" | "\\boldsymbol" => FontVariant::Bold,
            "\\mathit" => FontVariant::Italic,
            "\\mathsf" => FontVariant::SansSerif,
            "\\mathtt" => FontVariant::Monospace,
            "\\mathcal" | "\\mathscr" => FontVariant::Script,
            "\\mathbb" => FontVariant::DoubleStruck,
            "\\mathfrak" => FontVariant::Fraktur,
            _ => return None,
        };
        Some(variant)
    }

    /// Value of the MathML `mathvariant` attribute
    pub fn mathvariant(&self) -> &'static str {
        match self {
            FontVariant::Normal => "normal",
            FontVariant::Bold => "bold",
            FontVariant::Italic => "italic",
            FontVariant::SansSerif => "sans-serif",
            FontVariant::Monospace => "monospace",
            FontVariant::Script => "script",
            FontVariant::DoubleStruck => "double-struck",
            FontVariant::Fraktur => "fraktur",
        }
    }

    /// Variants whose letters live in the Mathematical Alphanumeric Symbols block
    pub fn needs_amssymb(&self) -> bool {
        matches!(self, FontVariant::DoubleStruck | FontVariant::Fraktur)
    }

    /// Plane-1 character for `c` in this variant, if there is one
    ///
    /// Letters that Unicode already encoded in the Letterlike Symbols block
    /// (ℝ, ℭ, ℒ, ...) map there instead of to the reserved plane-1 holes.
    pub fn plane1_char(&self, c: char) -> Option<char> {
        let (upper, lower, digit, holes): (u32, Option<u32>, Option<u32>, &[(char, char)]) =
            match self {
                FontVariant::DoubleStruck => (
                    0x1D538,
                    Some(0x1D552),
                    Some(0x1D7D8),
                    &[
                        ('C', 'ℂ'),
                        ('H', 'ℍ'),
                        ('N', 'ℕ'),
                        ('P', 'ℙ'),
                        ('Q', 'ℚ'),
                        ('R', 'ℝ'),
                        ('Z', 'ℤ'),
                    ],
                ),
                FontVariant::Fraktur => (
                    0x1D504,
                    Some(0x1D51E),
                    None,
                    &[('C', 'ℭ'), ('H', 'ℌ'), ('I', 'ℑ'), ('R', 'ℜ'), ('Z', 'ℨ')],
                ),
                FontVariant::Script => (
                    0x1D49C,
                    None,
                    None,
                    &[
                        ('B', 'ℬ'),
                        ('E', 'ℰ'),
                        ('F', 'ℱ'),
                        ('H', 'ℋ'),
                        ('I', 'ℐ'),
                        ('L', 'ℒ'),
                        ('M', 'ℳ'),
                        ('R', 'ℛ'),
                    ],
                ),
                _ => return None,
            };

        if let Some((_, mapped)) = holes.iter().find(|(from, _)| *from == c) {
            return Some(*mapped);
        }
        let code = match c {
            'A'..='Z' => upper + (c as u32 - 'A' as u32),
            'a'..='z' => lower? + (c as u32 - 'a' as u32),
            '0'..='9' => digit? + (c as u32 - '0' as u32),
            _ => return None,
        };
        char::from_u32(code)
    }
}

lazy_static! {
    static ref SYMBOLS: HashMap<&'static str, Symbol> = build_symbol_table();
}

/// Look up an argument-free command
pub fn lookup(command: &str) -> Option<Symbol> {
    SYMBOLS.get(command).copied()
}

/// Commands this engine refuses outright
pub fn is_reserved(command: &str) -> bool {
    matches!(
        command,
        "\\newcommand"
            | "\\renewcommand"
            | "\\def"
            | "\\gdef"
            | "\\edef"
            | "\\let"
            | "\\catcode"
            | "\\input"
            | "\\include"
            | "\\write"
            | "\\immediate"
            | "\\special"
            | "\\csname"
            | "\\endcsname"
    )
}

/// Text for a `\left`/`\right` delimiter token, `""` for the null delimiter `.`
pub fn delimiter(token: &str) -> Option<&'static str> {
    let text = match token {
        "." => "",
        "(" => "(",
        ")" => ")",
        "[" => "[",
        "]" => "]",
        "|" | "\\vert" => "|",
        "\\|" | "\\Vert" => "\u{2016}",
        "/" => "/",
        "\\{" | "\\lbrace" => "{",
        "\\}" | "\\rbrace" => "}",
        "\\langle" => "\u{27E8}",
        "\\rangle" => "\u{27E9}",
        "\\lfloor" => "\u{230A}",
        "\\rfloor" => "\u{230B}",
        "\\lceil" => "\u{2308}",
        "\\rceil" => "\u{2309}",
        _ => return None,
    };
    Some(text)
}

/// Accent mark for an accent command, plus whether it goes underneath and stretches
pub fn accent(command: &str) -> Option<(&'static str, bool, bool)> {
    let accent = match command {
        "\\hat" => ("^", false, false),
        "\\widehat" => ("^", false, true),
        "\\tilde" => ("~", false, false),
        "\\widetilde" => ("~", false, true),
        "\\bar" => ("\u{00AF}", false, false),
        "\\overline" => ("\u{00AF}", false, true),
        "\\underline" => ("_", true, true),
        "\\vec" => ("\u{2192}", false, false),
        "\\overrightarrow" => ("\u{2192}", false, true),
        "\\dot" => ("\u{02D9}", false, false),
        "\\ddot" => ("\u{00A8}", false, false),
        "\\check" => ("\u{02C7}", false, false),
        "\\breve" => ("\u{02D8}", false, false),
        "\\acute" => ("\u{00B4}", false, false),
        "\\grave" => ("`", false, false),
        _ => return None,
    };
    Some(accent)
}

fn build_symbol_table() -> HashMap<&'static str, Symbol> {
    let mut map = HashMap::new();

    let lower_greek = [
        ("\\alpha", "\u{03B1}"),
        ("\\beta", "\u{03B2}"),
        ("\\gamma", "\u{03B3}"),
        ("\\delta", "\u{03B4}"),
        ("\\epsilon", "\u{03F5}"),
        ("\\varepsilon", "\u{03B5}"),
        ("\\zeta", "\u{03B6}"),
        ("\\eta", "\u{03B7}"),
        ("\\theta", "\u{03B8}"),
        ("\\vartheta", "\u{03D1}"),
        ("\\iota", "\u{03B9}"),
        ("\\kappa", "\u{03BA}"),
        ("\\lambda", "\u{03BB}"),
        ("\\mu", "\u{03BC}"),
        ("\\nu", "\u{03BD}"),
        ("\\xi", "\u{03BE}"),
        ("\\pi", "\u{03C0}"),
        ("\\varpi", "\u{03D6}"),
        ("\\rho", "\u{03C1}"),
        ("\\varrho", "\u{03F1}"),
        ("\\sigma", "\u{03C3}"),
        ("\\varsigma", "\u{03C2}"),
        ("\\tau", "\u{03C4}"),
        ("\\upsilon", "\u{03C5}"),
        ("\\phi", "\u{03D5}"),
        ("\\varphi", "\u{03C6}"),
        ("\\chi", "\u{03C7}"),
        ("\\psi", "\u{03C8}"),
        ("\\omega", "\u{03C9}"),
        ("\\ell", "\u{2113}"),
        ("\\imath", "\u{0131}"),
        ("\\jmath", "\u{0237}"),
    ];
    for (command, text) in lower_greek {
        map.insert(command, Symbol::Identifier { text, upright: false });
    }

    let upright = [
        ("\\Gamma", "\u{0393}"),
        ("\\Delta", "\u{0394}"),
        ("\\Theta", "\u{0398}"),
        ("\\Lambda", "\u{039B}"),
        ("\\Xi", "\u{039E}"),
        ("\\Pi", "\u{03A0}"),
        ("\\Sigma", "\u{03A3}"),
        ("\\Upsilon", "\u{03A5}"),
        ("\\Phi", "\u{03A6}"),
        ("\\Psi", "\u{03A8}"),
        ("\\Omega", "\u{03A9}"),
        ("\\infty", "\u{221E}"),
        ("\\partial", "\u{2202}"),
        ("\\nabla", "\u{2207}"),
        ("\\emptyset", "\u{2205}"),
        ("\\varnothing", "\u{2205}"),
        ("\\hbar", "\u{210F}"),
        ("\\aleph", "\u{2135}"),
        ("\\Re", "\u{211C}"),
        ("\\Im", "\u{2111}"),
        ("\\wp", "\u{2118}"),
        ("\\%", "%"),
        ("\\$", "$"),
        ("\\#", "#"),
        ("\\&", "&"),
        ("\\_", "_"),
    ];
    for (command, text) in upright {
        map.insert(command, Symbol::Identifier { text, upright: true });
    }

    let operators = [
        // binary
        ("\\pm", "\u{00B1}"),
        ("\\mp", "\u{2213}"),
        ("\\times", "\u{00D7}"),
        ("\\div", "\u{00F7}"),
        ("\\cdot", "\u{22C5}"),
        ("\\ast", "\u{2217}"),
        ("\\star", "\u{22C6}"),
        ("\\circ", "\u{2218}"),
        ("\\bullet", "\u{2219}"),
        ("\\cap", "\u{2229}"),
        ("\\cup", "\u{222A}"),
        ("\\setminus", "\u{2216}"),
        ("\\wedge", "\u{2227}"),
        ("\\land", "\u{2227}"),
        ("\\vee", "\u{2228}"),
        ("\\lor", "\u{2228}"),
        ("\\oplus", "\u{2295}"),
        ("\\otimes", "\u{2297}"),
        // relations
        ("\\leq", "\u{2264}"),
        ("\\le", "\u{2264}"),
        ("\\geq", "\u{2265}"),
        ("\\ge", "\u{2265}"),
        ("\\neq", "\u{2260}"),
        ("\\ne", "\u{2260}"),
        ("\\equiv", "\u{2261}"),
        ("\\approx", "\u{2248}"),
        ("\\sim", "\u{223C}"),
        ("\\simeq", "\u{2243}"),
        ("\\cong", "\u{2245}"),
        ("\\propto", "\u{221D}"),
        ("\\ll", "\u{226A}"),
        ("\\gg", "\u{226B}"),
        ("\\in", "\u{2208}"),
        ("\\notin", "\u{2209}"),
        ("\\ni", "\u{220B}"),
        ("\\subset", "\u{2282}"),
        ("\\supset", "\u{2283}"),
        ("\\subseteq", "\u{2286}"),
        ("\\supseteq", "\u{2287}"),
        ("\\perp", "\u{22A5}"),
        ("\\parallel", "\u{2225}"),
        ("\\mid", "\u{2223}"),
        // arrows
        ("\\to", "\u{2192}"),
        ("\\rightarrow", "\u{2192}"),
        ("\\leftarrow", "\u{2190}"),
        ("\\gets", "\u{2190}"),
        ("\\leftrightarrow", "\u{2194}"),
        ("\\Rightarrow", "\u{21D2}"),
        ("\\Leftarrow", "\u{21D0}"),
        ("\\Leftrightarrow", "\u{21D4}"),
        ("\\implies", "\u{27F9}"),
        ("\\iff", "\u{27FA}"),
        ("\\mapsto", "\u{21A6}"),
        ("\\uparrow", "\u{2191}"),
        ("\\downarrow", "\u{2193}"),
        // logic and misc
        ("\\forall", "\u{2200}"),
        ("\\exists", "\u{2203}"),
        ("\\neg", "\u{00AC}"),
        ("\\lnot", "\u{00AC}"),
        ("\\ldots", "\u{2026}"),
        ("\\dots", "\u{2026}"),
        ("\\cdots", "\u{22EF}"),
        ("\\vdots", "\u{22EE}"),
        ("\\ddots", "\u{22F1}"),
        ("\\colon", ":"),
        ("\\prime", "\u{2032}"),
    ];
    for (command, text) in operators {
        map.insert(command, Symbol::Operator { text, fence: false });
    }

    let fences = [
        ("\\{", "{"),
        ("\\}", "}"),
        ("\\lbrace", "{"),
        ("\\rbrace", "}"),
        ("\\langle", "\u{27E8}"),
        ("\\rangle", "\u{27E9}"),
        ("\\lfloor", "\u{230A}"),
        ("\\rfloor", "\u{230B}"),
        ("\\lceil", "\u{2308}"),
        ("\\rceil", "\u{2309}"),
        ("\\vert", "|"),
        ("\\|", "\u{2016}"),
        ("\\Vert", "\u{2016}"),
    ];
    for (command, text) in fences {
        map.insert(command, Symbol::Operator { text, fence: true });
    }

    let large = [
        ("\\sum", "\u{2211}", true),
        ("\\prod", "\u{220F}", true),
        ("\\coprod", "\u{2210}", true),
        ("\\bigcup", "\u{22C3}", true),
        ("\\bigcap", "\u{22C2}", true),
        ("\\bigoplus", "\u{2A01}", true),
        ("\\bigotimes", "\u{2A02}", true),
        ("\\int", "\u{222B}", false),
        ("\\iint", "\u{222C}", false),
        ("\\iiint", "\u{222D}", false),
        ("\\oint", "\u{222E}", false),
    ];
    for (command, text, movable_limits) in large {
        map.insert(command, Symbol::LargeOperator { text, movable_limits });
    }

    let functions = [
        ("\\sin", false),
        ("\\cos", false),
        ("\\tan", false),
        ("\\cot", false),
        ("\\sec", false),
        ("\\csc", false),
        ("\\arcsin", false),
        ("\\arccos", false),
        ("\\arctan", false),
        ("\\sinh", false),
        ("\\cosh", false),
        ("\\tanh", false),
        ("\\log", false),
        ("\\ln", false),
        ("\\lg", false),
        ("\\exp", false),
        ("\\arg", false),
        ("\\deg", false),
        ("\\dim", false),
        ("\\ker", false),
        ("\\hom", false),
        ("\\lim", true),
        ("\\liminf", true),
        ("\\limsup", true),
        ("\\max", true),
        ("\\min", true),
        ("\\sup", true),
        ("\\inf", true),
        ("\\det", true),
        ("\\gcd", true),
        ("\\Pr", true),
    ];
    for (command, limits) in functions {
        map.insert(command, Symbol::Function { limits });
    }

    let spaces = [
        ("\\,", "0.167em"),
        ("\\thinspace", "0.167em"),
        ("\\:", "0.222em"),
        ("\\>", "0.222em"),
        ("\\;", "0.278em"),
        ("\\!", "-0.167em"),
        ("\\ ", "0.333em"),
        ("\\quad", "1em"),
        ("\\qquad", "2em"),
    ];
    for (command, width) in spaces {
        map.insert(command, Symbol::Space { width });
    }

    map
}
