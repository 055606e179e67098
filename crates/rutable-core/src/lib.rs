pub mod cell;
pub mod column;
pub mod config;
pub mod datatable;
pub mod date;
pub mod error;
pub mod events;
pub mod export;
pub mod import;
pub mod pager;
pub mod paginate;
pub mod render;
pub mod row;
pub mod search;
pub mod sort;
pub mod table;

pub use cell::Cell;
pub use column::{Column, ColumnMeta, ColumnType, Columns, DateFormat};
pub use config::{
    ColumnKind, ColumnOptions, ColumnSelect, Config, Labels, PageInfo, SearchConfig, Texts,
};
pub use datatable::DataTable;
pub use date::{ChronoDateParser, DateParser};
pub use error::{GridError, ImportError, Result};
pub use events::{Event, EventBus, EventKind, Subscription};
pub use export::{ExportFormat, ExportOptions, Selection, Snapshot};
pub use import::{ImportFormat, ImportOptions};
pub use pager::{build_pager, ButtonKind, PagerButton, PagerLayout, PagerTexts};
pub use paginate::Paginator;
pub use render::{HeaderView, NullRenderer, PageView, RecordingRenderer, Renderer, RowView};
pub use row::{Row, RowId, RowRef};
pub use search::{SearchEngine, SearchOptions};
pub use sort::{Direction, SortEngine, SortKey, SortState};
pub use table::{ColumnSpec, Table, TableData};
