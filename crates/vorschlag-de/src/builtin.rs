// Built-in word list used when no dictionary is available

/// Common German words, most frequent first. Serves as the word list when
/// the configured dictionary cannot be read.
pub const FALLBACK_WORDS: &[&str] = &[
    "der", "die", "das", "und", "ist", "in", "den", "von", "zu", "mit", "sich", "auf",
    "für", "nicht", "ein", "eine", "als", "auch", "es", "an", "werden", "aus", "er", "hat",
    "dass", "sie", "nach", "wird", "bei", "einer", "um", "am", "vor", "noch", "wie", "dem",
    "durch", "man", "nur", "einen", "sei", "sein", "war", "haben", "kann", "alle", "immer",
    "doch", "müssen", "würden", "können", "solche", "dieser", "ihre", "sagt", "über",
    "wir", "unter", "gegen", "damit", "würde", "keine", "schon", "sondern", "da", "diese",
    "seine", "oder", "ihr", "wollen", "geht", "jetzt", "muss", "ganz", "drei", "recht",
    "etwas", "dort", "vielleicht", "machte", "mensch", "leben", "zeit", "deutsch", "land",
    "stadt", "wo", "gut", "sehen", "sagen", "kommen", "gehen", "finden", "stehen",
    "lassen", "bleiben", "nehmen", "halten", "zeigen", "bringen", "fragen", "wissen",
    "meinen", "glauben", "denken", "ab", "aber", "allem", "allen", "aller", "alles",
    "also", "anderer", "anderem", "anderen", "anderes", "andere", "bin", "bis", "bist",
    "damit", "dann", "dein", "deine", "deinem", "deinen", "deiner", "deines", "dem",
    "denn", "des", "dessen", "dich", "dies", "die", "diesem", "diesen", "dieser", "dieses",
    "dir", "du", "einem", "einigen", "einiger", "einiges", "einmal", "euch", "euer",
    "eure", "eurem", "euren", "eurer", "eures", "gegen", "gewesen", "habe", "hier", "hin",
    "hinter", "ich", "ihm", "ihn", "ihrem", "ihren", "ihrer", "ihres", "im", "indem",
    "ins", "ja", "jede", "jedem", "jeden", "jeder", "jedes", "jener", "jenem", "jenen",
    "jenes", "kein", "keine", "keinem", "keinen", "keiner", "keines", "könnte", "machen",
    "manche", "manchem", "manchen", "mancher", "manches", "mein", "meine", "meinem",
    "meinen", "meiner", "meines", "nichts", "nun", "ob", "ohne", "sehr", "selbst", "sind",
    "so", "solchem", "solchen", "solcher", "solches", "soll", "sollen", "sollte", "sonst",
    "viel", "vom", "war", "waren", "warst", "was", "weg", "weil", "weiter", "welche",
    "welchem", "welchen", "welcher", "welches", "wenn", "wer", "werde", "wieder", "will",
    "wirst", "wollte", "während", "zwischen",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_list_is_usable() {
        assert!(FALLBACK_WORDS.len() > 200);
        assert!(FALLBACK_WORDS.iter().all(|w| w.chars().count() > 1));
        assert!(FALLBACK_WORDS.contains(&"für"));
    }
}
