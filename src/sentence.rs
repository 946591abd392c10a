/*!
Splits the raw lines of a document into sentences. Sentences are separated by blank lines.
*/

/// This struct iterates over the lines of a document and returns the sentences, i.e. the trimmed
/// non-blank lines found between two blank lines. It always yields a last sentence when the lines
/// run out, even if that sentence is empty.
pub struct Sentences<I> {
    lines: I,
    is_at_end: bool,
}

impl<I> Sentences<I> {
    fn new(lines: I) -> Self {
        Sentences {
            lines,
            is_at_end: false,
        }
    }
}

impl<'a, I> Iterator for Sentences<I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = Vec<&'a str>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_at_end {
            return None;
        }
        let mut sentence = Vec::new();
        loop {
            match self.lines.next() {
                Some(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        return Some(sentence);
                    }
                    sentence.push(line);
                }
                None => {
                    self.is_at_end = true;
                    return Some(sentence);
                }
            }
        }
    }
}

/// Lazily groups `lines` into sentences.
pub fn get_sentences<'a, I>(lines: I) -> Sentences<I::IntoIter>
where
    I: IntoIterator<Item = &'a str>,
{
    Sentences::new(lines.into_iter())
}
