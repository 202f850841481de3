//! # 化学元素符号
//!
//! 元素符号的规范化与校验 (H..Og)。
//!
//! ## 依赖关系
//! - 被 `parsers/upf.rs` 使用
//! - 无外部模块依赖

/// 周期表元素符号，按原子序数排列
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// 规范化元素符号（首字母大写，其余小写），未知符号返回 None
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    let first = chars.next()?;
    let symbol: String = first
        .to_uppercase()
        .chain(chars.flat_map(|c| c.to_lowercase()))
        .collect();

    if is_known_symbol(&symbol) {
        Some(symbol)
    } else {
        None
    }
}

/// 是否为已知元素符号（大小写敏感）
pub fn is_known_symbol(symbol: &str) -> bool {
    SYMBOLS.contains(&symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("si"), Some("Si".to_string()));
        assert_eq!(normalize_symbol(" HE "), Some("He".to_string()));
        assert_eq!(normalize_symbol("O"), Some("O".to_string()));
        assert_eq!(normalize_symbol("Xx"), None);
        assert_eq!(normalize_symbol(""), None);
    }

    #[test]
    fn test_table_bounds() {
        assert!(is_known_symbol("H"));
        assert!(is_known_symbol("Og"));
        assert!(!is_known_symbol("he"));
    }
}
