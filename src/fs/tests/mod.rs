pub mod userfs;
