mod cli_flow;
