use crate::bit_vec::BitVec;
use crate::frequency::{Symbol, PSEUDO_EOF};
use crate::hufftree::{HuffNode, HuffmanTree};

/// Symbol to bit-code mapping derived from a tree. `0` is a left branch, `1` a right branch.
///
/// A tree that is a single leaf has no branches; its one symbol gets the code `0`
/// and the decoder consumes one bit of any value for it.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<BitVec>>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; PSEUDO_EOF as usize + 1];
        match &tree.root {
            HuffNode::Leaf { symbol, .. } => {
                codes[*symbol as usize] = Some(BitVec::from("0"));
            }
            root => {
                let mut path = BitVec::new();
                fill(root, &mut path, &mut codes);
            }
        }
        CodeTable { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&BitVec> {
        self.codes.get(symbol as usize).and_then(|c| c.as_ref())
    }

    /// Code length in bits, if the symbol has a code.
    pub fn code_len(&self, symbol: Symbol) -> Option<u64> {
        self.get(symbol).map(|c| c.len() as u64)
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BitVec)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s as Symbol, c)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn fill(node: &HuffNode, path: &mut BitVec, codes: &mut [Option<BitVec>]) {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            codes[*symbol as usize] = Some(path.clone());
        }
        HuffNode::Internal { left, right, .. } => {
            path.push_bit(false);
            fill(left, path, codes);
            path.pop_bit();

            path.push_bit(true);
            fill(right, path, codes);
            path.pop_bit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_tree_paths() {
        let tree = HuffmanTree {
            root: HuffNode::merge(
                HuffNode::new(b'x' as Symbol, 5),
                HuffNode::merge(HuffNode::new(b'y' as Symbol, 1), HuffNode::new(PSEUDO_EOF, 1)),
            ),
        };
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(b'x' as Symbol).unwrap().to_string(), "0");
        assert_eq!(table.get(b'y' as Symbol).unwrap().to_string(), "10");
        assert_eq!(table.get(PSEUDO_EOF).unwrap().to_string(), "11");
        assert_eq!(table.get(b'z' as Symbol), None);
    }

    #[test]
    fn test_no_code_is_prefix_of_another() {
        let tree = HuffmanTree::from_bytes(b"a man a plan a canal panama, 0123456789").unwrap();
        let table = CodeTable::from_tree(&tree);
        let codes: Vec<String> = table.iter().map(|(_, c)| c.to_string()).collect();
        for (i, a) in codes.iter().enumerate() {
            assert!(!a.is_empty());
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_str()), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_single_leaf_gets_one_bit_code() {
        let tree = HuffmanTree::from_bytes(&[]).unwrap();
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.len(), 1);
        assert_eq!(table.code_len(PSEUDO_EOF), Some(1));
    }

    #[test]
    fn test_repeated_byte_codes_are_one_bit() {
        let tree = HuffmanTree::from_bytes(&[b'z'; 100]).unwrap();
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.code_len(b'z' as Symbol), Some(1));
        assert_eq!(table.code_len(PSEUDO_EOF), Some(1));
    }
}
