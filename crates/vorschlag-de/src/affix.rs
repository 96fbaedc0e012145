// Affix rules in the Hunspell .aff format (subset)
//
// Supported directives: SET, FLAG (char / long / num), PFX and SFX groups.
// Rule conditions support literal characters, `.` and bracket classes
// `[abc]` / `[^abc]`. Continuation classes after `/` in the affix field are
// accepted and ignored. Anything else is skipped.

use hashbrown::HashMap;
use tracing::debug;
use vorschlag_core::LoadError;
use vorschlag_core::character::{equals_ignore_case, fold_case};

/// An affix flag. Wide enough to hold a pair of characters in `FLAG long`
/// mode and any number in `FLAG num` mode.
pub type Flag = u64;

/// How flag strings are split into individual flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagMode {
    /// One character per flag (default).
    #[default]
    Char,
    /// Two characters per flag.
    Long,
    /// Comma-separated decimal numbers.
    Num,
}

impl FlagMode {
    /// Split a flag string into flags. Malformed numeric flags are dropped.
    pub fn parse_flags(self, s: &str) -> Vec<Flag> {
        match self {
            FlagMode::Char => s.chars().map(|c| c as Flag).collect(),
            FlagMode::Long => {
                let chars: Vec<char> = s.chars().collect();
                chars
                    .chunks(2)
                    .map(|pair| match *pair {
                        [a, b] => ((a as Flag) << 21) | b as Flag,
                        [a] => (a as Flag) << 21,
                        _ => 0,
                    })
                    .collect()
            }
            FlagMode::Num => s
                .split(',')
                .filter_map(|n| n.trim().parse::<Flag>().ok())
                .collect(),
        }
    }

    /// Parse a single flag as written in a PFX/SFX line.
    fn parse_one(self, s: &str) -> Option<Flag> {
        let flags = self.parse_flags(s);
        match flags.as_slice() {
            [flag] => Some(*flag),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CondPart {
    Any,
    Literal(char),
    Class { chars: Vec<char>, negated: bool },
}

impl CondPart {
    fn matches(&self, c: char) -> bool {
        match self {
            CondPart::Any => true,
            CondPart::Literal(l) => *l == c,
            CondPart::Class { chars, negated } => chars.contains(&c) != *negated,
        }
    }
}

/// A rule condition: a sequence of single-character patterns matched against
/// the start (prefixes) or end (suffixes) of the stem. Stored case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    parts: Vec<CondPart>,
}

impl Condition {
    /// Parse a condition. Returns `None` for an unterminated bracket class.
    pub fn parse(s: &str) -> Option<Self> {
        let folded = fold_case(s);
        let mut parts = Vec::new();
        let mut chars = folded.chars();
        while let Some(c) = chars.next() {
            match c {
                '.' => parts.push(CondPart::Any),
                '[' => {
                    let mut class = Vec::new();
                    let mut negated = false;
                    let mut closed = false;
                    for (i, d) in chars.by_ref().enumerate() {
                        match d {
                            ']' => {
                                closed = true;
                                break;
                            }
                            '^' if i == 0 => negated = true,
                            _ => class.push(d),
                        }
                    }
                    if !closed {
                        return None;
                    }
                    parts.push(CondPart::Class {
                        chars: class,
                        negated,
                    });
                }
                _ => parts.push(CondPart::Literal(c)),
            }
        }
        // A lone "." is the conventional "no condition"
        if parts.iter().all(|p| *p == CondPart::Any) {
            parts.clear();
        }
        Some(Self { parts })
    }

    /// Check the condition against the end of `word` (case-folded chars).
    pub fn matches_end(&self, word: &[char]) -> bool {
        let n = self.parts.len();
        word.len() >= n
            && self
                .parts
                .iter()
                .zip(&word[word.len() - n..])
                .all(|(p, &c)| p.matches(c))
    }

    /// Check the condition against the start of `word` (case-folded chars).
    pub fn matches_start(&self, word: &[char]) -> bool {
        word.len() >= self.parts.len()
            && self.parts.iter().zip(word).all(|(p, &c)| p.matches(c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

/// One PFX or SFX rule line.
#[derive(Debug, Clone)]
pub struct AffixRule {
    pub kind: AffixKind,
    pub flag: Flag,
    /// Characters removed from the stem before adding.
    pub strip: String,
    /// Characters added to the stem.
    pub add: String,
    pub condition: Condition,
    /// Whether this rule combines with rules of the other kind.
    pub cross_product: bool,
    strip_folded: String,
    add_folded: String,
}

impl AffixRule {
    pub fn new(
        kind: AffixKind,
        flag: Flag,
        strip: &str,
        add: &str,
        condition: Condition,
        cross_product: bool,
    ) -> Self {
        Self {
            kind,
            flag,
            strip: strip.to_string(),
            add: add.to_string(),
            condition,
            cross_product,
            strip_folded: fold_case(strip),
            add_folded: fold_case(add),
        }
    }

    /// Apply the rule to a stem, keeping the stem's casing. Returns `None`
    /// if the stem does not end (start) with the strip string or does not
    /// satisfy the condition.
    pub fn apply(&self, stem: &str) -> Option<String> {
        let chars: Vec<char> = stem.chars().collect();
        let folded: Vec<char> = chars.iter().flat_map(|c| c.to_lowercase()).collect();
        let n = self.strip.chars().count();
        if n > chars.len() {
            return None;
        }
        match self.kind {
            AffixKind::Suffix => {
                let split = chars.len() - n;
                let tail: String = chars[split..].iter().collect();
                if !equals_ignore_case(&tail, &self.strip) || !self.condition.matches_end(&folded) {
                    return None;
                }
                let mut out: String = chars[..split].iter().collect();
                out.push_str(&self.add);
                Some(out)
            }
            AffixKind::Prefix => {
                let head: String = chars[..n].iter().collect();
                if !equals_ignore_case(&head, &self.strip)
                    || !self.condition.matches_start(&folded)
                {
                    return None;
                }
                let mut out = self.add.clone();
                out.extend(&chars[n..]);
                Some(out)
            }
        }
    }

    /// Undo the rule on a case-folded word: remove the added characters,
    /// restore the stripped ones and check the condition on the result.
    pub fn unapply(&self, folded: &str) -> Option<String> {
        let stem = match self.kind {
            AffixKind::Suffix => {
                let rest = folded.strip_suffix(self.add_folded.as_str())?;
                if rest.is_empty() {
                    return None;
                }
                format!("{rest}{}", self.strip_folded)
            }
            AffixKind::Prefix => {
                let rest = folded.strip_prefix(self.add_folded.as_str())?;
                if rest.is_empty() {
                    return None;
                }
                format!("{}{rest}", self.strip_folded)
            }
        };
        let chars: Vec<char> = stem.chars().collect();
        let ok = match self.kind {
            AffixKind::Suffix => self.condition.matches_end(&chars),
            AffixKind::Prefix => self.condition.matches_start(&chars),
        };
        ok.then_some(stem)
    }
}

/// Parsed affix file.
#[derive(Debug, Clone, Default)]
pub struct AffixData {
    pub flag_mode: FlagMode,
    /// Value of the SET directive, informational only; resources are decoded
    /// before parsing.
    pub encoding: Option<String>,
    pub prefixes: Vec<AffixRule>,
    pub suffixes: Vec<AffixRule>,
    skipped: usize,
}

impl AffixData {
    /// Parse the text of an .aff file. Malformed lines are skipped and
    /// counted.
    pub fn parse(text: &str) -> Self {
        let mut data = AffixData::default();
        // Open groups: (kind, flag) -> (cross product, rules remaining)
        let mut groups: HashMap<(AffixKind, Flag), (bool, usize)> = HashMap::new();

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields[0] {
                "SET" => data.encoding = fields.get(1).map(|s| s.to_string()),
                "FLAG" => {
                    data.flag_mode = match fields.get(1).copied() {
                        Some("long") => FlagMode::Long,
                        Some("num") => FlagMode::Num,
                        _ => FlagMode::Char,
                    }
                }
                "PFX" | "SFX" => {
                    let kind = if fields[0] == "PFX" {
                        AffixKind::Prefix
                    } else {
                        AffixKind::Suffix
                    };
                    if let Err(reason) = data.parse_affix_line(kind, &fields, &mut groups) {
                        let err = LoadError::MalformedLine {
                            line: line_no + 1,
                            reason: reason.to_string(),
                        };
                        debug!(error = %err, "skipping affix line");
                        data.skipped += 1;
                    }
                }
                _ => {}
            }
        }
        data
    }

    fn parse_affix_line(
        &mut self,
        kind: AffixKind,
        fields: &[&str],
        groups: &mut HashMap<(AffixKind, Flag), (bool, usize)>,
    ) -> Result<(), &'static str> {
        if fields.len() < 4 {
            return Err("too few fields");
        }
        let Some(flag) = self.flag_mode.parse_one(fields[1]) else {
            return Err("invalid flag");
        };

        let open = groups.get(&(kind, flag)).is_some_and(|&(_, left)| left > 0);
        if !open {
            // Group header: PFX <flag> <Y|N> <count>
            let cross = match fields[2] {
                "Y" => true,
                "N" => false,
                _ => return Err("rule outside an open group"),
            };
            let Ok(count) = fields[3].parse::<usize>() else {
                return Err("invalid rule count");
            };
            groups.insert((kind, flag), (cross, count));
            return Ok(());
        }

        let Some(entry) = groups.get_mut(&(kind, flag)) else {
            return Err("rule outside an open group");
        };
        entry.1 -= 1;
        let cross = entry.0;

        let strip = match fields[2] {
            "0" => "",
            s => s,
        };
        let add = fields[3].split('/').next().unwrap_or("");
        let add = if add == "0" { "" } else { add };
        let Some(condition) = Condition::parse(fields.get(4).copied().unwrap_or(".")) else {
            return Err("unterminated condition class");
        };

        let rule = AffixRule::new(kind, flag, strip, add, condition, cross);
        match kind {
            AffixKind::Prefix => self.prefixes.push(rule),
            AffixKind::Suffix => self.suffixes.push(rule),
        }
        Ok(())
    }

    /// Number of affix lines that could not be parsed.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    pub fn rule_count(&self) -> usize {
        self.prefixes.len() + self.suffixes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFF: &str = "\
SET UTF-8
# Plural and genitive
SFX P Y 2
SFX P 0 e .
SFX P 0 er [^e]
SFX G Y 1
SFX G 0 es [^s]
PFX U Y 1
PFX U 0 un .
";

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn parse_groups_and_rules() {
        let data = AffixData::parse(AFF);
        assert_eq!(data.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(data.suffixes.len(), 3);
        assert_eq!(data.prefixes.len(), 1);
        assert_eq!(data.skipped_lines(), 0);
        assert!(data.suffixes.iter().all(|r| r.cross_product));
    }

    #[test]
    fn rule_without_header_is_skipped() {
        let data = AffixData::parse("SFX X 0 e abc extra\nSFX X 0\n");
        assert_eq!(data.rule_count(), 0);
        assert_eq!(data.skipped_lines(), 2);
    }

    #[test]
    fn excess_rules_are_treated_as_headers() {
        let data = AffixData::parse("SFX A N 1\nSFX A 0 e .\nSFX A 0 en .\n");
        assert_eq!(data.suffixes.len(), 1);
        assert_eq!(data.skipped_lines(), 1);
    }

    #[test]
    fn flag_modes() {
        assert_eq!(FlagMode::Char.parse_flags("AB"), vec!['A' as Flag, 'B' as Flag]);
        assert_eq!(FlagMode::Long.parse_flags("AaBb").len(), 2);
        assert_ne!(
            FlagMode::Long.parse_flags("Aa"),
            FlagMode::Long.parse_flags("aA")
        );
        assert_eq!(FlagMode::Num.parse_flags("1,20,x"), vec![1, 20]);
    }

    #[test]
    fn long_flags_in_rules() {
        let data = AffixData::parse("FLAG long\nSFX Aa Y 1\nSFX Aa 0 s .\n");
        assert_eq!(data.flag_mode, FlagMode::Long);
        assert_eq!(data.suffixes[0].flag, FlagMode::Long.parse_flags("Aa")[0]);
    }

    #[test]
    fn condition_classes() {
        let c = Condition::parse("[^aeiou]n").unwrap();
        assert!(c.matches_end(&chars("kern")));
        assert!(!c.matches_end(&chars("baun")));
        assert!(!c.matches_end(&chars("n")));
        assert!(Condition::parse("[ab").is_none());
        assert!(Condition::parse(".").unwrap().matches_end(&[]));
    }

    #[test]
    fn apply_suffix_keeps_casing() {
        let rule = AffixRule::new(
            AffixKind::Suffix,
            'P' as Flag,
            "",
            "er",
            Condition::parse("[^e]").unwrap(),
            true,
        );
        assert_eq!(rule.apply("Kind").as_deref(), Some("Kinder"));
        assert_eq!(rule.apply("Hase"), None);
    }

    #[test]
    fn apply_with_strip() {
        let rule = AffixRule::new(
            AffixKind::Suffix,
            'X' as Flag,
            "e",
            "en",
            Condition::parse("e").unwrap(),
            false,
        );
        assert_eq!(rule.apply("Hase").as_deref(), Some("Hasen"));
        assert_eq!(rule.unapply("hasen").as_deref(), Some("hase"));
    }

    #[test]
    fn apply_prefix() {
        let rule = AffixRule::new(
            AffixKind::Prefix,
            'U' as Flag,
            "",
            "un",
            Condition::default(),
            true,
        );
        assert_eq!(rule.apply("klar").as_deref(), Some("unklar"));
        assert_eq!(rule.unapply("unklar").as_deref(), Some("klar"));
        assert_eq!(rule.unapply("un"), None);
    }

    #[test]
    fn unapply_checks_condition() {
        let rule = AffixRule::new(
            AffixKind::Suffix,
            'G' as Flag,
            "",
            "es",
            Condition::parse("[^s]").unwrap(),
            true,
        );
        assert_eq!(rule.unapply("kindes").as_deref(), Some("kind"));
        assert_eq!(rule.unapply("hauses"), None);
    }
}
