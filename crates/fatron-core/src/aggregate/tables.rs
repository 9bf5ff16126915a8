//! Static classification tables for TRON reclassification.
//!
//! Process-wide, read-only configuration compiled into the binary. Nothing
//! here is derived from the document; tests may inject alternate tables via
//! [`crate::aggregate::AggregationEngine::new`].

/// Canonical description of the contracted-nursing bucket.
pub const NURSING_BUCKET: &str = "Enfermagem convencionada";

/// Canonical description of the generic diagnostics bucket.
pub const GENERIC_MCDT_BUCKET: &str = "MCDT";

/// Canonical description for unclassifiable sections.
pub const FALLBACK_BUCKET: &str = "OUTROS";

/// Label of the synthetic grand-total row.
pub const GRAND_TOTAL_LABEL: &str = "TOTAL GERAL";

/// Sentinel code for a canonical description missing from the code map.
/// Must be surfaced for operator review, never treated as a valid code.
pub const UNMAPPED_CODE: &str = "?";

/// Classification tables used by the aggregation engine.
pub struct ClassificationTables {
    /// Exact section-label lookup (uppercase label, canonical description).
    pub section_map: &'static [(&'static str, &'static str)],
    /// Numeric section-code prefixes routed wholesale to nursing.
    pub nursing_prefixes: &'static [&'static str],
    /// Canonical description to TRON aggregator code.
    pub code_map: &'static [(&'static str, &'static str)],
    /// MCDT sub-type keyword rules, evaluated top-down, first match wins.
    /// Keyword overlap is real (RMN contains RM), so order matters.
    pub mcdt_subtypes: &'static [(&'static str, &'static str)],
    /// Dressing/consumable keywords: items carrying one of these inside the
    /// MCDT section are mis-filed and reroute to nursing.
    pub dressing_keywords: &'static [&'static str],
    /// Marker identifying the diagnostics section label.
    pub mcdt_marker: &'static str,
}

/// Default tables for the supported invoice layout family.
pub static DEFAULT_TABLES: ClassificationTables = ClassificationTables {
    section_map: &[
        ("FÁRMACOS", "Fármacos"),
        ("MEDICAMENTOS", "Fármacos"),
        ("EQUIPA CIRURGICA", "Equipa cirúrgica"),
        ("EQUIPA CIRÚRGICA", "Equipa cirúrgica"),
        ("HONORÁRIOS MÉDICOS", "Honorários médicos"),
        ("DIÁRIAS DE INTERNAMENTO", "Internamento"),
        ("BLOCO OPERATÓRIO", "Bloco operatório"),
    ],
    // Section codes the layout family uses for consumables and nursing
    // material; their declared totals route to contracted nursing whatever
    // the rest of the label says.
    nursing_prefixes: &["21", "22", "26"],
    code_map: &[
        ("Enfermagem convencionada", "33"),
        ("MCDT", "40"),
        ("MCDT - Radiologia", "41"),
        ("MCDT - TAC", "42"),
        ("MCDT - Ecografia", "43"),
        ("MCDT - Electromiografia", "44"),
        ("MCDT - Ressonância magnética", "45"),
        ("Fármacos", "52"),
        ("Equipa cirúrgica", "61"),
        ("Honorários médicos", "62"),
        ("Internamento", "71"),
        ("Bloco operatório", "72"),
        ("OUTROS", "99"),
    ],
    // RMN before RM: both are in circulation for resonance and the longer
    // token must win.
    mcdt_subtypes: &[
        ("RX", "MCDT - Radiologia"),
        ("TAC", "MCDT - TAC"),
        ("ECO", "MCDT - Ecografia"),
        ("EMG", "MCDT - Electromiografia"),
        ("RMN", "MCDT - Ressonância magnética"),
        ("RM", "MCDT - Ressonância magnética"),
    ],
    dressing_keywords: &["PENSO", "COMPRESSA", "LIGADURA", "ADESIVO"],
    mcdt_marker: "MCDT",
};

impl ClassificationTables {
    /// Exact-label lookup against the uppercased section label.
    pub fn canonical_for_label(&self, label: &str) -> Option<&'static str> {
        let upper = label.trim().to_uppercase();
        self.section_map
            .iter()
            .find(|(key, _)| *key == upper)
            .map(|(_, canonical)| *canonical)
    }

    /// Whether the label starts with a nursing section-code prefix.
    pub fn has_nursing_prefix(&self, label: &str) -> bool {
        let label = label.trim_start();
        self.nursing_prefixes.iter().any(|prefix| {
            label.starts_with(prefix)
                && !label[prefix.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_digit())
        })
    }

    /// Whether the label belongs to the diagnostics section.
    pub fn is_mcdt_label(&self, label: &str) -> bool {
        label.to_uppercase().contains(self.mcdt_marker)
    }

    /// TRON code for a canonical description, if mapped.
    pub fn code_for(&self, canonical: &str) -> Option<&'static str> {
        self.code_map
            .iter()
            .find(|(key, _)| *key == canonical)
            .map(|(_, code)| *code)
    }

    /// First sub-type rule whose keyword occurs as a whole word in the
    /// item description.
    pub fn mcdt_subtype_for(&self, description: &str) -> Option<&'static str> {
        let upper = description.to_uppercase();
        self.mcdt_subtypes
            .iter()
            .find(|(keyword, _)| contains_word(&upper, keyword))
            .map(|(_, canonical)| *canonical)
    }

    /// Whether the item description carries a dressing/consumable keyword.
    pub fn is_dressing(&self, description: &str) -> bool {
        let upper = description.to_uppercase();
        self.dressing_keywords
            .iter()
            .any(|keyword| upper.contains(keyword))
    }
}

/// Whole-word containment: the keyword must not be flanked by alphanumeric
/// characters ("RM" inside "FORMA" or "NORMAL" never matches).
fn contains_word(text: &str, word: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = text[start..].find(word) {
        let begin = start + pos;
        let end = begin + word.len();

        let before_ok = text[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = text[end..].chars().next().is_none_or(|c| !c.is_alphanumeric());

        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}
