use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use fst::raw::{CompiledAddr, Fst};
use fst::Set;
use tracing::info;

use super::error::LoadError;

/// Word list compiled into an fst. The fst doubles as the prefix trie that
/// move generation walks.
pub struct Dictionary {
    words: Set<Vec<u8>>,
}

impl Dictionary {
    /// Reads a word list with one word per line
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
        let reader = BufReader::new(file);
        let mut words = Vec::new();
        for line in reader.lines() {
            words.push(line.map_err(|e| LoadError::io(path, e))?);
        }
        let dictionary = Self::from_words(words)?;
        info!(path = %path.display(), words = dictionary.len(), "loaded dictionary");
        Ok(dictionary)
    }

    /// Builds a dictionary from any list of words. Words are upper-cased,
    /// sorted and de-duplicated; anything shorter than two letters or
    /// containing a non-letter is skipped.
    pub fn from_words<I, S>(words: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| w.len() >= 2 && w.bytes().all(|b| b.is_ascii_uppercase()))
            .collect::<Vec<_>>();
        vocab.sort_unstable();
        vocab.dedup();
        let words = Set::from_iter(vocab)?;
        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Checks for a complete word, not just a prefix
    pub fn is_word(&self, word: &str) -> bool {
        self.words.contains(word.to_ascii_uppercase())
    }

    pub fn root(&self) -> TrieNode<'_> {
        let fst = self.words.as_fst();
        TrieNode {
            fst,
            addr: fst.root().addr(),
        }
    }

    /// Walks the trie along `prefix`. The empty prefix is the root
    pub fn find_prefix(&self, prefix: &str) -> Option<TrieNode<'_>> {
        prefix
            .chars()
            .try_fold(self.root(), |node, c| node.next(c))
    }
}

/// Cursor into the dictionary trie: the set of words sharing one prefix.
#[derive(Clone, Copy)]
pub struct TrieNode<'a> {
    fst: &'a Fst<Vec<u8>>,
    addr: CompiledAddr,
}

impl<'a> TrieNode<'a> {
    /// Whether the prefix leading here is itself a word
    pub fn is_final(&self) -> bool {
        self.fst.node(self.addr).is_final()
    }

    pub fn next(&self, letter: char) -> Option<TrieNode<'a>> {
        if !letter.is_ascii() {
            return None;
        }
        let node = self.fst.node(self.addr);
        node.find_input(letter.to_ascii_uppercase() as u8)
            .map(|i| TrieNode {
                fst: self.fst,
                addr: node.transition_addr(i),
            })
    }

    /// Single-letter extensions in alphabetical order
    pub fn children(&self) -> impl Iterator<Item = (char, TrieNode<'a>)> + 'a {
        let fst = self.fst;
        let node = fst.node(self.addr);
        (0..node.len()).map(move |i| {
            let t = node.transition(i);
            (t.inp as char, TrieNode { fst, addr: t.addr })
        })
    }
}

impl fmt::Debug for TrieNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let letters = self.children().map(|(c, _)| c).collect::<String>();
        f.debug_struct("TrieNode")
            .field("is_final", &self.is_final())
            .field("next", &letters)
            .finish()
    }
}
