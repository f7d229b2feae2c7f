//! Phantom types for query builder states.
//!
//! These zero-sized types enforce valid method chaining at compile time. A
//! SELECT moves forward through `Unfiltered → Filtered → Grouped → Ordered →
//! Limited`, any step may be skipped, and no step can be repeated or undone.
//! An UPDATE only moves from `Unfiltered` to `Filtered`.

/// Initial state: no WHERE clause yet.
#[derive(Debug, Clone, Copy)]
pub struct Unfiltered;

/// State after `.filter()`.
#[derive(Debug, Clone, Copy)]
pub struct Filtered;

/// State after `.group_by()`.
#[derive(Debug, Clone, Copy)]
pub struct Grouped;

/// State after `.order_by()`.
#[derive(Debug, Clone, Copy)]
pub struct Ordered;

/// State after `.limit()`. Terminal.
#[derive(Debug, Clone, Copy)]
pub struct Limited;

/// States from which `.group_by()` is allowed.
pub trait CanGroup {}

impl CanGroup for Unfiltered {}
impl CanGroup for Filtered {}

/// States from which `.order_by()` is allowed.
pub trait CanOrder {}

impl CanOrder for Unfiltered {}
impl CanOrder for Filtered {}
impl CanOrder for Grouped {}

/// States from which `.limit()` is allowed.
pub trait CanLimit {}

impl CanLimit for Unfiltered {}
impl CanLimit for Filtered {}
impl CanLimit for Grouped {}
impl CanLimit for Ordered {}
