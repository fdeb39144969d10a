//! Parsing of `--tower` and `--merge` command-line values.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use lifeline_defence_core::{CellCoord, WeaponKind};

/// Tower requested on the command line, written as `<kind>@<column>,<row>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerSpec {
    pub(crate) kind: WeaponKind,
    pub(crate) cell: CellCoord,
}

impl FromStr for TowerSpec {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, cell) = value
            .split_once('@')
            .ok_or_else(|| anyhow!("expected <kind>@<column>,<row>, got `{value}`"))?;

        let kind = match kind.trim().to_ascii_lowercase().as_str() {
            "turret" => WeaponKind::Turret,
            "mortar" => WeaponKind::Mortar,
            other => bail!("unknown weapon `{other}`, expected turret or mortar"),
        };

        Ok(Self {
            kind,
            cell: parse_cell(cell)?,
        })
    }
}

/// Grid cell written as `<column>,<row>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellSpec(pub(crate) CellCoord);

impl FromStr for CellSpec {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_cell(value).map(Self)
    }
}

fn parse_cell(value: &str) -> anyhow::Result<CellCoord> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected <column>,<row>, got `{value}`"))?;
    let column = column
        .trim()
        .parse()
        .with_context(|| format!("invalid column `{column}`"))?;
    let row = row
        .trim()
        .parse()
        .with_context(|| format!("invalid row `{row}`"))?;
    Ok(CellCoord::new(column, row))
}
