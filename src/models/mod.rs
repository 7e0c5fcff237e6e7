pub mod mongo_model;
