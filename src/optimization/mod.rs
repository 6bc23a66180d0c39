pub mod order_search;
