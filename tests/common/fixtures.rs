//! Go sources and locations shared by integration tests.
#![allow(dead_code)]

use impls_lens::domain::anchor::{Location, Position, Range};
use std::path::PathBuf;

pub const WORKSPACE: &str = "/work/shop";

pub const STORE_INTERFACE: &str = "package store

// Store persists items.
type Store interface {
\t// Get loads one item.
\tGet(ctx context.Context, id string) (*Item, error)
\tList(
\t\tctx context.Context,
\t\tfilter Filter,
\t) ([]*Item, error)

\tio.Closer
\tDelete(ctx context.Context, id string) error
}

func NewStore() Store { return nil }
";

pub const PG_STORE: &str = "package store


func (s *pgStore) Get(ctx context.Context, id string) (*Item, error) {
\trow := s.db.QueryRow(ctx, q, id)
\treturn scan(row)
}
";

pub const MOCK_STORE: &str = "package mocks

func (m *MockStore) Get(ctx context.Context, id string) (*Item, error) {
\treturn m.item, m.err
}
";

pub const MEM_STORE: &str = "package store

func (s *memStore) Get(_ context.Context, id string) (*Item, error) {
\treturn s.items[id], nil
}
";

pub fn path(rel: &str) -> PathBuf {
    PathBuf::from(WORKSPACE).join(rel)
}

/// Location spanning lines `start..=end` of `rel`.
pub fn location(rel: &str, start: u32, end: u32) -> Location {
    Location::new(
        path(rel),
        Range::new(Position::new(start, 0), Position::new(end, 1)),
    )
}
