// テーブル依存順序
//
// 外部キーによるテーブル間の依存関係から、CREATE/DROPの順序を決定します。
// 同順位のテーブルは宣言順に並べるため、同じ入力からは常に同じ順序が得られます。

use crate::core::error::GeneratorError;
use crate::core::metadata::{Database, TableId};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::warn;

/// 外部キーから依存関係グラフを構築
///
/// 各テーブルについて、参照しているテーブルのリストを返します。
/// `tables` に含まれるテーブル間の依存関係のみを抽出し、自己参照は除外します。
fn build_dependency_graph(
    database: &Database,
    tables: &[TableId],
) -> Result<HashMap<TableId, Vec<TableId>>, GeneratorError> {
    let scope: HashSet<TableId> = tables.iter().copied().collect();
    let mut dependencies = HashMap::new();

    for &id in tables {
        let table = database.get_table(id)?;
        let mut deps = Vec::new();
        for foreign_key in &table.foreign_keys {
            let referenced = foreign_key.referenced_table;
            if referenced != id && scope.contains(&referenced) && !deps.contains(&referenced) {
                deps.push(referenced);
            }
        }
        dependencies.insert(id, deps);
    }

    Ok(dependencies)
}

/// Kahnのアルゴリズムによるトポロジカルソート
///
/// 依存先（参照されるテーブル）が先に来るように並び替えます。
///
/// # Returns
///
/// (ソート済みテーブル, 循環に含まれる残余テーブル)。いずれも宣言順を保ちます。
fn topological_sort_kahn(
    tables: &[TableId],
    dependencies: &HashMap<TableId, Vec<TableId>>,
) -> (Vec<TableId>, Vec<TableId>) {
    let position: HashMap<TableId, usize> =
        tables.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    // 入次数 = 未処理の依存先の数
    let mut in_degree: HashMap<TableId, usize> = tables
        .iter()
        .map(|id| (*id, dependencies.get(id).map_or(0, Vec::len)))
        .collect();

    // 宣言位置の小さいものから取り出す
    let mut queue: BTreeSet<usize> = tables
        .iter()
        .enumerate()
        .filter(|(_, id)| in_degree[*id] == 0)
        .map(|(i, _)| i)
        .collect();

    let mut sorted = Vec::with_capacity(tables.len());
    while let Some(next) = queue.pop_first() {
        let node = tables[next];
        sorted.push(node);

        for &other in tables {
            let depends = dependencies
                .get(&other)
                .is_some_and(|deps| deps.contains(&node));
            if !depends {
                continue;
            }
            if let Some(degree) = in_degree.get_mut(&other) {
                *degree -= 1;
                if *degree == 0 {
                    queue.insert(position[&other]);
                }
            }
        }
    }

    let remaining = tables
        .iter()
        .copied()
        .filter(|id| in_degree[id] > 0)
        .collect();

    (sorted, remaining)
}

/// テーブルを作成順に並べる
///
/// 参照先テーブルが参照元より先に来ます。循環参照に含まれるテーブルは
/// 宣言順のまま末尾に追加され、それらの外部キーは呼び出し元で後回しにされます。
pub fn creation_order(
    database: &Database,
    tables: &[TableId],
) -> Result<Vec<TableId>, GeneratorError> {
    let dependencies = build_dependency_graph(database, tables)?;
    let (mut sorted, remaining) = topological_sort_kahn(tables, &dependencies);

    if !remaining.is_empty() {
        let names = remaining
            .iter()
            .map(|id| database.get_table(*id).map(|t| t.name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        warn!(
            tables = ?names,
            "Circular foreign key references detected, keeping declaration order"
        );
        sorted.extend(remaining);
    }

    Ok(sorted)
}

/// テーブルを削除順に並べる
///
/// 作成順の逆で、参照元テーブルが先に来ます。
pub fn drop_order(
    database: &Database,
    tables: &[TableId],
) -> Result<Vec<TableId>, GeneratorError> {
    let mut order = creation_order(database, tables)?;
    order.reverse();
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DialectKind;
    use crate::core::metadata::{Column, ForeignKey, ReferentialAction};
    use crate::core::type_code;

    fn add_table(database: &mut Database, name: &str) -> TableId {
        let schema = crate::core::metadata::SchemaId(0);
        let id = database.add_table(schema, name).unwrap();
        let table = database.get_table_mut(id).unwrap();
        table
            .add_column(Column::new("id", type_code::INTEGER, "INT"))
            .unwrap();
        table
            .add_column(Column::new("ref_id", type_code::INTEGER, "INT"))
            .unwrap();
        id
    }

    fn reference(database: &mut Database, from: TableId, to: TableId) {
        database
            .get_table_mut(from)
            .unwrap()
            .add_foreign_key(ForeignKey {
                name: None,
                columns: vec!["ref_id".to_string()],
                referenced_table: to,
                referenced_columns: vec!["id".to_string()],
                update_action: ReferentialAction::NoAction,
                delete_action: ReferentialAction::NoAction,
            })
            .unwrap();
    }

    fn database() -> Database {
        let mut database = Database::new(Some(DialectKind::MySQL));
        let catalog = database.add_catalog(Some("shop")).unwrap();
        database.add_schema(catalog, None).unwrap();
        database
    }

    #[test]
    fn test_referenced_tables_first() {
        let mut database = database();
        let orders = add_table(&mut database, "orders");
        let users = add_table(&mut database, "users");
        let items = add_table(&mut database, "items");
        reference(&mut database, orders, users);
        reference(&mut database, items, orders);

        let tables = vec![orders, users, items];
        assert_eq!(
            creation_order(&database, &tables).unwrap(),
            vec![users, orders, items]
        );
        assert_eq!(
            drop_order(&database, &tables).unwrap(),
            vec![items, orders, users]
        );
    }

    #[test]
    fn test_independent_tables_keep_declaration_order() {
        let mut database = database();
        let c = add_table(&mut database, "c");
        let a = add_table(&mut database, "a");
        let b = add_table(&mut database, "b");

        assert_eq!(creation_order(&database, &[c, a, b]).unwrap(), vec![c, a, b]);
    }

    #[test]
    fn test_self_reference_is_ignored() {
        let mut database = database();
        let employees = add_table(&mut database, "employees");
        reference(&mut database, employees, employees);

        assert_eq!(
            creation_order(&database, &[employees]).unwrap(),
            vec![employees]
        );
    }

    #[test]
    fn test_cycle_falls_back_to_declaration_order() {
        let mut database = database();
        let standalone = add_table(&mut database, "standalone");
        let a = add_table(&mut database, "a");
        let b = add_table(&mut database, "b");
        reference(&mut database, a, b);
        reference(&mut database, b, a);

        assert_eq!(
            creation_order(&database, &[a, b, standalone]).unwrap(),
            vec![standalone, a, b]
        );
    }

    #[test]
    fn test_out_of_scope_reference_is_ignored() {
        let mut database = database();
        let users = add_table(&mut database, "users");
        let orders = add_table(&mut database, "orders");
        reference(&mut database, orders, users);

        assert_eq!(creation_order(&database, &[orders]).unwrap(), vec![orders]);
    }
}
