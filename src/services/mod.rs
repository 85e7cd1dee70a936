// Services Layer
// メタデータグラフ全体を対象としたスクリプト生成のオーケストレーション

pub mod dependency_order;
pub mod script_generator_manager;
