//! Codeword assignment and the persisted header form of the code table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::error::{Result, SqueezError};
use crate::frequency::FrequencyTable;
use crate::tree::TreeNode;

/// Bit sequence assigned to one symbol. `false` is bit `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codeword(Vec<bool>);

impl Codeword {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Codeword {
    type Err = SqueezError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(SqueezError::MalformedHeader("empty codeword".into()));
        }
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(SqueezError::MalformedHeader(format!(
                    "codeword {:?} contains {:?}",
                    s, other
                ))),
            })
            .collect::<Result<Vec<bool>>>()
            .map(Codeword)
    }
}

/// Symbol to codeword mapping, immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<char, Codeword>,
}

impl CodeTable {
    /// Assign every leaf the path from the root (`0` left, `1` right).
    /// A lone leaf root gets the one-bit codeword `0`.
    pub fn from_tree(root: &TreeNode) -> Self {
        let mut codes = BTreeMap::new();
        match root {
            TreeNode::Leaf { symbol, .. } => {
                codes.insert(*symbol, Codeword(vec![false]));
            }
            TreeNode::Internal { .. } => {
                let mut path = Vec::new();
                collect(root, &mut path, &mut codes);
            }
        }
        CodeTable { codes }
    }

    pub fn get(&self, symbol: char) -> Option<&Codeword> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Codeword)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Payload size in bits for text with the given frequencies.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> Result<u64> {
        frequencies.iter().try_fold(0u64, |acc, (symbol, weight)| {
            let code = self.get(symbol).ok_or(SqueezError::UnknownSymbol(symbol))?;
            Ok(acc + weight * code.len() as u64)
        })
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut sorted: Vec<&Codeword> = self.codes.values().collect();
        sorted.sort();
        // in lexicographic order a prefix sorts right before its extensions
        sorted.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }

    /// Compact JSON keyed by decimal code point, e.g. `{"97":"0","98":"1"}`.
    /// Never contains a newline.
    pub fn to_header(&self) -> Result<Vec<u8>> {
        let header: BTreeMap<u32, String> = self
            .codes
            .iter()
            .map(|(&symbol, code)| (symbol as u32, code.to_string()))
            .collect();
        serde_json::to_vec(&header).map_err(|e| SqueezError::Serialization(e.to_string()))
    }

    pub fn from_header(bytes: &[u8]) -> Result<Self> {
        let header: BTreeMap<u32, String> = serde_json::from_slice(bytes)
            .map_err(|e| SqueezError::MalformedHeader(e.to_string()))?;

        let mut codes = BTreeMap::new();
        for (point, code) in header {
            let symbol = char::from_u32(point).ok_or_else(|| {
                SqueezError::MalformedHeader(format!("{} is not a unicode scalar value", point))
            })?;
            codes.insert(symbol, code.parse::<Codeword>()?);
        }
        Ok(CodeTable { codes })
    }
}

fn collect(node: &TreeNode, path: &mut Vec<bool>, codes: &mut BTreeMap<char, Codeword>) {
    match node {
        TreeNode::Leaf { symbol, .. } => {
            let code = Codeword(path.clone());
            trace!(symbol = ?symbol, code = %code, "assigned codeword");
            codes.insert(*symbol, code);
        }
        TreeNode::Internal { left, right, .. } => {
            path.push(false);
            collect(left, path, codes);
            path.pop();

            path.push(true);
            collect(right, path, codes);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;

    fn table_for(text: &str) -> CodeTable {
        let root = build_tree(&FrequencyTable::analyze(text)).unwrap().unwrap();
        CodeTable::from_tree(&root)
    }

    fn code(table: &CodeTable, symbol: char) -> String {
        table.get(symbol).unwrap().to_string()
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = table_for("aaaa");
        assert_eq!(table.len(), 1);
        assert_eq!(code(&table, 'a'), "0");
    }

    #[test]
    fn test_skewed_distribution() {
        let table = table_for("aaaaaaaabc");
        assert_eq!(code(&table, 'a'), "1");
        assert_eq!(code(&table, 'b'), "00");
        assert_eq!(code(&table, 'c'), "01");
        assert!(table.get('a').unwrap().len() < table.get('b').unwrap().len());
    }

    #[test]
    fn test_two_symbols_get_one_bit_each() {
        let table = table_for("aaaaaaaab");
        assert_eq!(code(&table, 'b'), "0");
        assert_eq!(code(&table, 'a'), "1");
    }

    #[test]
    fn test_sibling_paths_do_not_leak() {
        let table = table_for("abcdefgh");
        // eight equal weights give a complete tree of depth three
        assert!(table.iter().all(|(_, code)| code.len() == 3));
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_prefix_free_detection() {
        let table = CodeTable::from_header(br#"{"97":"0","98":"01"}"#).unwrap();
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_encoded_bits() {
        let text = "aaaaaaaabc";
        let frequencies = FrequencyTable::analyze(text);
        let table = table_for(text);
        assert_eq!(table.encoded_bits(&frequencies).unwrap(), 8 + 2 + 2);

        let other = FrequencyTable::analyze("z");
        assert!(matches!(
            table.encoded_bits(&other),
            Err(SqueezError::UnknownSymbol('z'))
        ));
    }

    #[test]
    fn test_header_format() {
        let table = table_for("aaaaaaaabc");
        let header = table.to_header().unwrap();
        assert_eq!(header, br#"{"97":"1","98":"00","99":"01"}"#.to_vec());
        assert_eq!(CodeTable::from_header(&header).unwrap(), table);
    }

    #[test]
    fn test_header_never_contains_newline() {
        let table = table_for("line one\nline two\r\n\ttabbed \"quoted\"");
        assert!(table.get('\n').is_some());
        assert!(!table.to_header().unwrap().contains(&b'\n'));
    }

    #[test]
    fn test_header_rejects_bad_codewords() {
        let headers: [&[u8]; 5] = [
            br#"{"97":""}"#,
            br#"{"97":"012"}"#,
            br#"{"55296":"0"}"#,
            br#"["97","0"]"#,
            b"not json",
        ];
        for header in headers {
            let err = CodeTable::from_header(header).unwrap_err();
            assert!(matches!(err, SqueezError::MalformedHeader(_)), "{:?}", err);
        }
    }
}
