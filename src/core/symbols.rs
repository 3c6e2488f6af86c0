//! Tradable symbols and their fixed rotation groups.

/// Pairs polled by the service, in rotation order.
pub const SYMBOLS: &[&str] = &[
    "btcusd", "ltcusd", "ethusd", "bchusd", "neousd", "xrpusd", "iotusd", "etcusd", "rrtusd",
    "zecusd", "eosusd", "sanusd", "omgusd", "xmrusd", "dshusd", "bccusd", "bcuusd", "etpusd",
    "qtmusd", "bt1usd", "bt2usd", "avtusd", "edousd", "btgusd", "datusd", "qshusd", "yywusd",
];

/// Number of groups the symbol list is split into.
pub const GROUP_COUNT: usize = 3;

/// Size of every group except the last, which takes the remainder.
pub const GROUP_SIZE: usize = 10;

/// The symbol list split into `GROUP_COUNT` ordered, disjoint groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolGroups {
    groups: Vec<Vec<String>>,
}

impl SymbolGroups {
    /// Splits `symbols` into the first `GROUP_SIZE`, the next `GROUP_SIZE` and
    /// the remainder. Short lists yield empty trailing groups.
    pub fn partition<S: AsRef<str>>(symbols: &[S]) -> Self {
        let len = symbols.len();
        let groups = (0..GROUP_COUNT)
            .map(|index| {
                let start = (index * GROUP_SIZE).min(len);
                let end = if index + 1 == GROUP_COUNT {
                    len
                } else {
                    (start + GROUP_SIZE).min(len)
                };
                symbols[start..end]
                    .iter()
                    .map(|s| s.as_ref().to_string())
                    .collect()
            })
            .collect();

        Self { groups }
    }

    /// Groups for the compiled-in symbol list.
    pub fn standard() -> Self {
        Self::partition(SYMBOLS)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[String]> {
        self.groups.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.groups.iter().map(Vec::as_slice)
    }
}
