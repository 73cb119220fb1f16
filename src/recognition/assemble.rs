use crate::models::SENTINEL;

/// Join classified characters in reading order, dropping every sentinel
pub fn assemble<I>(characters: I) -> String
where
    I: IntoIterator<Item = char>,
{
    characters.into_iter().filter(|&c| c != SENTINEL).collect()
}
