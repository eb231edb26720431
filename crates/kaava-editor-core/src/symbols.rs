//! Toolbar symbol catalogue.
//!
//! Each entry is inserted with [`FormulaEditor::insert_symbol`](crate::FormulaEditor::insert_symbol):
//! into the open formula if there is one, otherwise as a new formula.

/// Toolbar grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolGroup {
    Operators,
    Relations,
    Structures,
    Greek,
    Sets,
}

/// A toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarSymbol {
    /// Button label.
    pub label: &'static str,
    /// Text inserted into the formula buffer.
    pub latex: &'static str,
    pub group: SymbolGroup,
}

const fn sym(label: &'static str, latex: &'static str, group: SymbolGroup) -> ToolbarSymbol {
    ToolbarSymbol {
        label,
        latex,
        group,
    }
}

pub const TOOLBAR_SYMBOLS: &[ToolbarSymbol] = &[
    sym("·", "*", SymbolGroup::Operators),
    sym("±", r"\pm ", SymbolGroup::Operators),
    sym("÷", "/", SymbolGroup::Operators),
    sym("x²", "^2", SymbolGroup::Operators),
    sym("xⁿ", "^", SymbolGroup::Operators),
    sym("≤", r"\le ", SymbolGroup::Relations),
    sym("≥", r"\ge ", SymbolGroup::Relations),
    sym("≠", r"\ne ", SymbolGroup::Relations),
    sym("≈", r"\approx ", SymbolGroup::Relations),
    sym("a/b", r"\frac{}{}", SymbolGroup::Structures),
    sym("√", r"\sqrt{}", SymbolGroup::Structures),
    sym("ⁿ√", r"\sqrt[]{}", SymbolGroup::Structures),
    sym("|x|", r"\left| \right|", SymbolGroup::Structures),
    sym("∫", r"\int ", SymbolGroup::Structures),
    sym("Σ", r"\sum ", SymbolGroup::Structures),
    sym("lim", r"\lim_{x \to }", SymbolGroup::Structures),
    sym("log", r"\log ", SymbolGroup::Structures),
    sym("sin", r"\sin ", SymbolGroup::Structures),
    sym("cos", r"\cos ", SymbolGroup::Structures),
    sym("tan", r"\tan ", SymbolGroup::Structures),
    sym("α", r"\alpha ", SymbolGroup::Greek),
    sym("β", r"\beta ", SymbolGroup::Greek),
    sym("π", r"\pi ", SymbolGroup::Greek),
    sym("θ", r"\theta ", SymbolGroup::Greek),
    sym("Δ", r"\Delta ", SymbolGroup::Greek),
    sym("∞", r"\infty ", SymbolGroup::Sets),
    sym("ℝ", r"\mathbb{R}", SymbolGroup::Sets),
    sym("∈", r"\in ", SymbolGroup::Sets),
];

/// Symbols belonging to one toolbar group, in display order.
pub fn symbols_in(group: SymbolGroup) -> impl Iterator<Item = &'static ToolbarSymbol> {
    TOOLBAR_SYMBOLS.iter().filter(move |s| s.group == group)
}

/// Look up a symbol by its button label.
pub fn find_symbol(label: &str) -> Option<&'static ToolbarSymbol> {
    TOOLBAR_SYMBOLS.iter().find(|s| s.label == label)
}
