mod server_tests;
