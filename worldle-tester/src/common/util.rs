pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" smoke, ,season,  share-grid ");
        assert_eq!(parts, vec!["smoke", "season", "share-grid"]);
    }

    #[test]
    fn split_csv_keeps_range_tokens_whole() {
        let parts = split_csv("2024-01-01..2024-01-07,today");
        assert_eq!(parts, vec!["2024-01-01..2024-01-07", "today"]);
    }
}
