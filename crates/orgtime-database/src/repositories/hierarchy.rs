//! Closure-table hierarchy repository.
//!
//! The `employee_hierarchy` table is the transitive closure of the
//! immediate supervisor edges: a depth-0 self edge per employee plus one
//! row per ancestor/descendant pair at its cumulative depth. Ancestor and
//! descendant queries are plain range scans; no recursive traversal ever
//! happens.
//!
//! Every mutation takes an explicit `&mut PgConnection` handle. The
//! service layer owns the surrounding transaction and its
//! commit/rollback boundary, so a failure mid-mutation rolls the closure
//! table and the supervisor pointer back together.

use sqlx::postgres::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;

use orgtime_core::error::{AppError, ErrorKind};
use orgtime_core::result::AppResult;
use orgtime_entity::employee::{HierarchyDelta, HierarchyEdge, RankedEmployee};

/// Repository for the employee hierarchy closure table.
#[derive(Debug, Clone)]
pub struct HierarchyRepository {
    pool: PgPool,
}

/// Compute the edges joining two subtrees when `target`'s subtree is
/// attached under `supervisor`.
///
/// `ancestors` are the ancestors-or-self of the supervisor with their
/// recorded closure depths; `descendants` are the descendants-or-self of
/// the target with theirs. For every pair the new edge depth is the sum of
/// both recorded depths plus one for the new link itself. Both inputs must
/// be fetched ordered by ascending depth so the insertion order matches
/// the closure invariant.
pub fn cross_edges(
    ancestors: &[(Uuid, i32)],
    descendants: &[(Uuid, i32)],
) -> Vec<HierarchyEdge> {
    let mut edges = Vec::with_capacity(ancestors.len() * descendants.len());
    for (ancestor_id, ancestor_depth) in ancestors {
        for (descendant_id, descendant_depth) in descendants {
            edges.push(HierarchyEdge {
                ancestor_id: *ancestor_id,
                descendant_id: *descendant_id,
                depth: ancestor_depth + descendant_depth + 1,
            });
        }
    }
    edges
}

impl HierarchyRepository {
    /// Create a new hierarchy repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the depth-0 self edge for a newly created employee.
    ///
    /// No pre-existing edges may reference this id; the primary key
    /// enforces that.
    pub async fn insert_self_edge(
        &self,
        conn: &mut PgConnection,
        employee_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO employee_hierarchy (ancestor_id, descendant_id, depth) \
             VALUES ($1, $1, 0)",
        )
        .bind(employee_id)
        .execute(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("employee_hierarchy_pkey") =>
            {
                AppError::invalid_hierarchy(format!(
                    "Employee {employee_id} already has hierarchy edges"
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert self edge", e),
        })?;
        Ok(())
    }

    /// Ancestors of `employee_id` with their depths, ordered by ascending
    /// depth. `include_self` adds the depth-0 self row.
    pub async fn get_ancestors(
        &self,
        employee_id: Uuid,
        include_self: bool,
    ) -> AppResult<Vec<RankedEmployee>> {
        sqlx::query_as::<_, RankedEmployee>(
            "SELECT e.user_id, e.first_name, e.last_name, e.supervisor_id, h.depth \
             FROM employees e \
             JOIN employee_hierarchy h ON h.ancestor_id = e.user_id \
             WHERE h.descendant_id = $1 AND h.depth >= $2 \
             ORDER BY h.depth ASC",
        )
        .bind(employee_id)
        .bind(min_depth(include_self))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch ancestors", e))
    }

    /// Descendants of `employee_id` with their depths, ordered by ascending
    /// depth. `include_self` adds the depth-0 self row.
    pub async fn get_descendants(
        &self,
        employee_id: Uuid,
        include_self: bool,
    ) -> AppResult<Vec<RankedEmployee>> {
        sqlx::query_as::<_, RankedEmployee>(
            "SELECT e.user_id, e.first_name, e.last_name, e.supervisor_id, h.depth \
             FROM employees e \
             JOIN employee_hierarchy h ON h.descendant_id = e.user_id \
             WHERE h.ancestor_id = $1 AND h.depth >= $2 \
             ORDER BY h.depth ASC",
        )
        .bind(employee_id)
        .bind(min_depth(include_self))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch descendants", e))
    }

    /// Ancestor ids of `employee_id` with their depths, ordered by
    /// ascending depth, read inside an open transaction.
    pub async fn ancestor_ids(
        &self,
        conn: &mut PgConnection,
        employee_id: Uuid,
        include_self: bool,
    ) -> AppResult<Vec<(Uuid, i32)>> {
        sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT ancestor_id, depth FROM employee_hierarchy \
             WHERE descendant_id = $1 AND depth >= $2 \
             ORDER BY depth ASC",
        )
        .bind(employee_id)
        .bind(min_depth(include_self))
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch ancestor ids", e))
    }

    /// Descendant ids of `employee_id` with their depths, ordered by
    /// ascending depth, read inside an open transaction.
    pub async fn descendant_ids(
        &self,
        conn: &mut PgConnection,
        employee_id: Uuid,
        include_self: bool,
    ) -> AppResult<Vec<(Uuid, i32)>> {
        sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT descendant_id, depth FROM employee_hierarchy \
             WHERE ancestor_id = $1 AND depth >= $2 \
             ORDER BY depth ASC",
        )
        .bind(employee_id)
        .bind(min_depth(include_self))
        .fetch_all(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to fetch descendant ids", e)
        })
    }

    /// Insert a batch of closure edges inside an open transaction.
    pub async fn insert_edges(
        &self,
        conn: &mut PgConnection,
        edges: &[HierarchyEdge],
    ) -> AppResult<()> {
        if edges.is_empty() {
            return Ok(());
        }

        let ancestors: Vec<Uuid> = edges.iter().map(|e| e.ancestor_id).collect();
        let descendants: Vec<Uuid> = edges.iter().map(|e| e.descendant_id).collect();
        let depths: Vec<i32> = edges.iter().map(|e| e.depth).collect();

        sqlx::query(
            "INSERT INTO employee_hierarchy (ancestor_id, descendant_id, depth) \
             SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::int4[])",
        )
        .bind(&ancestors)
        .bind(&descendants)
        .bind(&depths)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert hierarchy edges", e)
        })?;
        Ok(())
    }

    /// Delete every edge crossing the cut point: ancestor strictly above
    /// the severed link, descendant at or below the target. These are
    /// exactly the edges that existed only because of the link being
    /// severed.
    pub async fn delete_crossing_edges(
        &self,
        conn: &mut PgConnection,
        upper_ids: &[Uuid],
        lower_ids: &[Uuid],
    ) -> AppResult<u64> {
        if upper_ids.is_empty() || lower_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "DELETE FROM employee_hierarchy \
             WHERE ancestor_id = ANY($1) AND descendant_id = ANY($2)",
        )
        .bind(upper_ids)
        .bind(lower_ids)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete hierarchy edges", e)
        })?;

        Ok(result.rows_affected())
    }

    /// Whether `ancestor_id` sits above `descendant_id`, read inside an
    /// open transaction. Used for the cycle check before an assignment.
    pub async fn is_ancestor_of(
        &self,
        conn: &mut PgConnection,
        ancestor_id: Uuid,
        descendant_id: Uuid,
    ) -> AppResult<bool> {
        let depth: Option<i32> = sqlx::query_scalar(
            "SELECT depth FROM employee_hierarchy \
             WHERE ancestor_id = $1 AND descendant_id = $2",
        )
        .bind(ancestor_id)
        .bind(descendant_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check ancestry", e))?;

        Ok(depth.map(|d| d > 0).unwrap_or(false))
    }

    /// Relative hierarchy position of `a` with respect to `b`.
    ///
    /// Returns `Ancestor(+d)` if `a` sits `d` hops above `b`,
    /// `Descendant(d)` if `d` hops below, `Same` for identical ids, and
    /// `Unrelated` otherwise. `max_depth` bounds the accepted depth as a
    /// safety net against a corrupted table; it is not a limit on
    /// organizational depth.
    pub async fn hierarchy_delta(
        &self,
        a: Uuid,
        b: Uuid,
        max_depth: i32,
    ) -> AppResult<HierarchyDelta> {
        if a == b {
            return Ok(HierarchyDelta::Same);
        }

        let down: Option<i32> = sqlx::query_scalar(
            "SELECT depth FROM employee_hierarchy \
             WHERE ancestor_id = $1 AND descendant_id = $2 AND depth <= $3",
        )
        .bind(a)
        .bind(b)
        .bind(max_depth)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to query hierarchy", e))?;

        if let Some(depth) = down {
            return Ok(HierarchyDelta::Ancestor(depth));
        }

        let up: Option<i32> = sqlx::query_scalar(
            "SELECT depth FROM employee_hierarchy \
             WHERE ancestor_id = $2 AND descendant_id = $1 AND depth <= $3",
        )
        .bind(a)
        .bind(b)
        .bind(max_depth)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to query hierarchy", e))?;

        match up {
            Some(depth) => Ok(HierarchyDelta::Descendant(depth)),
            None => Ok(HierarchyDelta::Unrelated),
        }
    }
}

fn min_depth(include_self: bool) -> i32 {
    if include_self { 0 } else { 1 }
}
