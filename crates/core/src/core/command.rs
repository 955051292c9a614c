//! DRAM command representation and the fixed-width text format the
//! simulator emits one line of per issued command (spec §4.7).

use std::fmt;

/// A single DRAM command issued to one `(bank_group, bank)` coordinate on a
/// channel, as returned by the request state machine each time it advances
/// far enough to issue one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// First half of an activate.
    Act0 { bank_group: usize, bank: usize, row: u32 },
    /// Second half of an activate; this is the one that actually opens the row.
    Act1 { bank_group: usize, bank: usize, row: u32 },
    /// Closes the open row.
    Pre { bank_group: usize, bank: usize },
    /// First half of a read column-access.
    Rd0 { bank_group: usize, bank: usize, column: u32 },
    /// Second half of a read column-access.
    Rd1 { bank_group: usize, bank: usize, column: u32 },
    /// First half of a write column-access.
    Wr0 { bank_group: usize, bank: usize, column: u32 },
    /// Second half of a write column-access.
    Wr1 { bank_group: usize, bank: usize, column: u32 },
}

impl Command {
    /// The command's fixed mnemonic, as printed in the command log.
    #[must_use]
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Act0 { .. } => "ACT0",
            Self::Act1 { .. } => "ACT1",
            Self::Pre { .. } => "PRE",
            Self::Rd0 { .. } => "RD0",
            Self::Rd1 { .. } => "RD1",
            Self::Wr0 { .. } => "WR0",
            Self::Wr1 { .. } => "WR1",
        }
    }

    /// Renders the fixed-width line this command contributes to the
    /// command log: a ten-character right-aligned cycle, the channel, a
    /// four-character left-aligned mnemonic, and a command-specific
    /// bank-group/bank/(row|column) suffix.
    #[must_use]
    pub fn format_line(&self, cycle: u64, channel: usize) -> String {
        use fmt::Write as _;

        let mut line = format!("{cycle:>10} {channel} {:<4}", self.mnemonic());
        match *self {
            Self::Act0 { bank_group, bank, row } | Self::Act1 { bank_group, bank, row } => {
                let _ = write!(line, " {bank_group} {bank} 0x{row:04X}");
            }
            Self::Pre { bank_group, bank } => {
                let _ = write!(line, " {bank_group} {bank}");
            }
            Self::Rd0 { bank_group, bank, column }
            | Self::Rd1 { bank_group, bank, column }
            | Self::Wr0 { bank_group, bank, column }
            | Self::Wr1 { bank_group, bank, column } => {
                let _ = write!(line, " {bank_group} {bank} 0x{column:04X}");
            }
        }
        line
    }
}
