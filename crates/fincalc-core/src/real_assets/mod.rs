pub mod rental_npv;
