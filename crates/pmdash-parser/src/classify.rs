//! Sheet classifier
//!
//! Routes a sheet by its name to one of four processors. Matching is
//! substring containment against English/Arabic keyword pairs, checked in a
//! fixed order; the first match wins. Unmatched sheets are ignored.

/// Processing path for a recognized sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SheetKind {
    Activities,
    Support,
    Risks,
    Timeline,
}

impl SheetKind {
    /// Check order. A name containing several keywords takes the earliest kind.
    pub const PRIORITY: [SheetKind; 4] = [
        SheetKind::Activities,
        SheetKind::Support,
        SheetKind::Risks,
        SheetKind::Timeline,
    ];

    /// (English keyword, Arabic keyword)
    pub fn keywords(&self) -> (&'static str, &'static str) {
        match self {
            SheetKind::Activities => ("activities", "أنشطة"),
            SheetKind::Support => ("support", "دعم"),
            SheetKind::Risks => ("risks", "مخاطر"),
            SheetKind::Timeline => ("timeline", "جدول"),
        }
    }

    fn matches(&self, lowered_name: &str) -> bool {
        let (english, arabic) = self.keywords();
        lowered_name.contains(english) || lowered_name.contains(arabic)
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keywords().0)
    }
}

/// Classify a sheet name; `None` means the sheet is ignored.
pub fn classify(sheet_name: &str) -> Option<SheetKind> {
    let lowered = sheet_name.to_lowercase();
    SheetKind::PRIORITY
        .into_iter()
        .find(|kind| kind.matches(&lowered))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_names_case_insensitive() {
        assert_eq!(classify("Activities"), Some(SheetKind::Activities));
        assert_eq!(classify("SUPPORT tasks"), Some(SheetKind::Support));
        assert_eq!(classify("Open Risks"), Some(SheetKind::Risks));
        assert_eq!(classify("Project Timeline"), Some(SheetKind::Timeline));
    }

    #[test]
    fn arabic_names() {
        assert_eq!(classify("أنشطة المشروع"), Some(SheetKind::Activities));
        assert_eq!(classify("الدعم التشغيلي"), Some(SheetKind::Support));
        assert_eq!(classify("المخاطر والتحديات"), Some(SheetKind::Risks));
        assert_eq!(classify("الجدول الزمني"), Some(SheetKind::Timeline));
    }

    #[test]
    fn unknown_names_are_ignored() {
        assert_eq!(classify("Notes"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("Sheet1"), None);
    }

    #[test]
    fn first_match_in_priority_order_wins() {
        assert_eq!(classify("Risks and Activities"), Some(SheetKind::Activities));
        assert_eq!(classify("Timeline of support"), Some(SheetKind::Support));
        assert_eq!(classify("جدول المخاطر"), Some(SheetKind::Risks));
    }
}
