use std::iter::Peekable;
use std::str::Chars;

/// Parsed math expression tree over the supported TeX subset.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// A run of literal glyphs (merged adjacent symbols).
    Run(String),
    /// Horizontal sequence.
    Row(Vec<Node>),
    /// `\frac{num}{den}`.
    Frac(Box<Node>, Box<Node>),
    /// `\sqrt{..}`.
    Sqrt(Box<Node>),
    /// Base with optional super/subscript.
    Script {
        base: Box<Node>,
        sup: Option<Box<Node>>,
        sub: Option<Box<Node>>,
    },
    /// Explicit horizontal space, in ems.
    Space(f64),
}

/// Error for formulas outside the supported subset. Never escapes the
/// typesetter; the caller falls back to drawing the literal text.
#[derive(Debug, thiserror::Error)]
#[error("unsupported math input: {0}")]
pub struct ParseError(pub String);

/// Parse a delimiter-free formula body into a [`Node`].
pub fn parse(formula: &str) -> Result<Node, ParseError> {
    let mut p = Parser {
        chars: formula.chars().peekable(),
    };
    let items = p.parse_row(None)?;
    if p.chars.peek().is_some() {
        return Err(ParseError("unbalanced '}'".into()));
    }
    Ok(Node::Row(items))
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn parse_row(&mut self, until: Option<char>) -> Result<Vec<Node>, ParseError> {
        let mut items: Vec<Node> = Vec::new();

        while let Some(&c) = self.chars.peek() {
            match c {
                _ if Some(c) == until => {
                    self.chars.next();
                    return Ok(items);
                }
                '}' => return Err(ParseError("unbalanced '}'".into())),
                '{' => {
                    self.chars.next();
                    let inner = self.parse_row(Some('}'))?;
                    items.push(Node::Row(inner));
                }
                '\\' => {
                    self.chars.next();
                    if let Some(node) = self.parse_command()? {
                        push_merged(&mut items, node);
                    }
                }
                '^' | '_' => {
                    self.chars.next();
                    let arg = self.parse_atom()?;
                    attach_script(&mut items, c == '^', arg)?;
                }
                _ if c.is_whitespace() => {
                    self.chars.next();
                }
                _ => {
                    self.chars.next();
                    push_merged(&mut items, Node::Run(c.to_string()));
                }
            }
        }

        if until.is_some() {
            return Err(ParseError("unbalanced '{'".into()));
        }
        Ok(items)
    }

    /// One following unit: a group, a command, or a single character.
    fn parse_atom(&mut self) -> Result<Node, ParseError> {
        loop {
            match self.chars.peek() {
                None => return Err(ParseError("missing argument".into())),
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('{') => {
                    self.chars.next();
                    return Ok(Node::Row(self.parse_row(Some('}'))?));
                }
                Some('\\') => {
                    self.chars.next();
                    return match self.parse_command()? {
                        Some(node) => Ok(node),
                        None => Ok(Node::Row(Vec::new())),
                    };
                }
                Some(&c) => {
                    self.chars.next();
                    return Ok(Node::Run(c.to_string()));
                }
            }
        }
    }

    /// Parse a command after the backslash. `Ok(None)` means the command is
    /// layout-neutral (e.g. `\left.`).
    fn parse_command(&mut self) -> Result<Option<Node>, ParseError> {
        // Single-character control sequences first.
        if let Some(&c) = self.chars.peek() {
            if !c.is_ascii_alphabetic() {
                self.chars.next();
                return match c {
                    ',' => Ok(Some(Node::Space(0.17))),
                    ';' => Ok(Some(Node::Space(0.28))),
                    '!' => Ok(Some(Node::Space(0.0))),
                    ' ' => Ok(Some(Node::Space(0.33))),
                    '{' | '}' | '%' | '$' | '&' | '#' | '_' => {
                        Ok(Some(Node::Run(c.to_string())))
                    }
                    '\\' => Ok(Some(Node::Space(0.0))),
                    other => Err(ParseError(format!("unknown control sequence '\\{other}'"))),
                };
            }
        }

        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphabetic() {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(ParseError("dangling backslash".into()));
        }

        match name.as_str() {
            "frac" => {
                let num = self.parse_atom()?;
                let den = self.parse_atom()?;
                Ok(Some(Node::Frac(Box::new(num), Box::new(den))))
            }
            "sqrt" => Ok(Some(Node::Sqrt(Box::new(self.parse_atom()?)))),
            "text" | "mathrm" | "mathbf" | "textbf" | "operatorname" => {
                // Style is not distinguished; the argument is shaped as-is.
                Ok(Some(self.parse_text_group()?))
            }
            "left" | "right" => {
                let delim = self
                    .chars
                    .next()
                    .ok_or_else(|| ParseError(format!("\\{name} without a delimiter")))?;
                match delim {
                    '.' => Ok(None),
                    '\\' => {
                        let c = self
                            .chars
                            .next()
                            .ok_or_else(|| ParseError("dangling backslash".into()))?;
                        Ok(Some(Node::Run(c.to_string())))
                    }
                    c => Ok(Some(Node::Run(c.to_string()))),
                }
            }
            "quad" => Ok(Some(Node::Space(1.0))),
            "qquad" => Ok(Some(Node::Space(2.0))),
            _ => match symbol(&name) {
                Some(c) => Ok(Some(Node::Run(c.to_string()))),
                None => Err(ParseError(format!("unknown command '\\{name}'"))),
            },
        }
    }

    /// `\text{...}`: the braced argument is kept verbatim, spaces included.
    fn parse_text_group(&mut self) -> Result<Node, ParseError> {
        match self.chars.peek() {
            Some('{') => {
                self.chars.next();
                let mut out = String::new();
                for c in self.chars.by_ref() {
                    if c == '}' {
                        return Ok(Node::Run(out));
                    }
                    out.push(c);
                }
                Err(ParseError("unbalanced '{' in text group".into()))
            }
            Some(&c) => {
                self.chars.next();
                Ok(Node::Run(c.to_string()))
            }
            None => Err(ParseError("missing text argument".into())),
        }
    }
}

/// Merge adjacent literal runs so shaping sees whole words/numbers.
fn push_merged(items: &mut Vec<Node>, node: Node) {
    if let (Some(Node::Run(prev)), Node::Run(s)) = (items.last_mut(), &node) {
        prev.push_str(s);
        return;
    }
    items.push(node);
}

/// Attach a script argument to the last item, splitting off the final glyph
/// of a merged run so `x^2` scripts only the `x`.
fn attach_script(items: &mut Vec<Node>, is_sup: bool, arg: Node) -> Result<(), ParseError> {
    let base = match items.pop() {
        None => Node::Row(Vec::new()),
        Some(Node::Run(mut s)) => {
            let last = s.pop().ok_or_else(|| ParseError("script without base".into()))?;
            if !s.is_empty() {
                items.push(Node::Run(s));
            }
            Node::Run(last.to_string())
        }
        Some(other) => other,
    };

    let node = match base {
        Node::Script {
            base,
            mut sup,
            mut sub,
        } => {
            let slot = if is_sup { &mut sup } else { &mut sub };
            if slot.is_some() {
                return Err(ParseError("double script".into()));
            }
            *slot = Some(Box::new(arg));
            Node::Script { base, sup, sub }
        }
        base => Node::Script {
            base: Box::new(base),
            sup: is_sup.then(|| Box::new(arg.clone())),
            sub: (!is_sup).then(|| Box::new(arg)),
        },
    };
    items.push(node);
    Ok(())
}

/// Unicode substitution for supported symbol commands.
pub fn symbol(name: &str) -> Option<char> {
    Some(match name {
        "alpha" => 'α',
        "beta" => 'β',
        "gamma" => 'γ',
        "delta" => 'δ',
        "epsilon" | "varepsilon" => 'ε',
        "zeta" => 'ζ',
        "eta" => 'η',
        "theta" => 'θ',
        "iota" => 'ι',
        "kappa" => 'κ',
        "lambda" => 'λ',
        "mu" => 'μ',
        "nu" => 'ν',
        "xi" => 'ξ',
        "pi" => 'π',
        "rho" => 'ρ',
        "sigma" => 'σ',
        "tau" => 'τ',
        "upsilon" => 'υ',
        "phi" | "varphi" => 'φ',
        "chi" => 'χ',
        "psi" => 'ψ',
        "omega" => 'ω',
        "Gamma" => 'Γ',
        "Delta" => 'Δ',
        "Theta" => 'Θ',
        "Lambda" => 'Λ',
        "Xi" => 'Ξ',
        "Pi" => 'Π',
        "Sigma" => 'Σ',
        "Upsilon" => 'Υ',
        "Phi" => 'Φ',
        "Psi" => 'Ψ',
        "Omega" => 'Ω',
        "times" => '×',
        "div" => '÷',
        "pm" => '±',
        "mp" => '∓',
        "cdot" => '·',
        "ast" => '∗',
        "leq" => '≤',
        "geq" => '≥',
        "neq" => '≠',
        "approx" => '≈',
        "equiv" => '≡',
        "sim" => '∼',
        "propto" => '∝',
        "infty" => '∞',
        "rightarrow" => '→',
        "leftarrow" => '←',
        "Rightarrow" => '⇒',
        "Leftarrow" => '⇐',
        "leftrightarrow" => '↔',
        "sum" => '∑',
        "prod" => '∏',
        "int" => '∫',
        "partial" => '∂',
        "nabla" => '∇',
        "degree" => '°',
        "circ" => '∘',
        "bullet" => '•',
        "dots" | "ldots" | "cdots" => '…',
        "in" => '∈',
        "notin" => '∉',
        "subset" => '⊂',
        "supset" => '⊃',
        "subseteq" => '⊆',
        "supseteq" => '⊇',
        "cup" => '∪',
        "cap" => '∩',
        "forall" => '∀',
        "exists" => '∃',
        "emptyset" | "varnothing" => '∅',
        "angle" => '∠',
        "perp" => '⊥',
        "parallel" => '∥',
        "therefore" => '∴',
        "because" => '∵',
        "prime" => '′',
        _ => return None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/math/parse.rs"]
mod tests;
